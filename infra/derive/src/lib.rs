#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros shared by the waitlist crates. They remove the boilerplate
//! around error enums, HTTP data models, `OpenAPI`-documented handlers and
//! feature slice handles.
//!
//! The examples below are `ignore`d because a proc-macro crate cannot use its
//! own macros in doctests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Defines an HTTP data model (request/response DTO).
///
/// * Adds `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` unless already derived.
/// * Applies `#[serde(rename_all = "camelCase")]` unless overridden.
/// * Applies `#[serde(deny_unknown_fields)]` unless `deny_unknown_fields = false`.
///
/// ```rust,ignore
/// use waitlist_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct RegistrationReceipt {
///     pub id: String,
///     pub full_name: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Wraps an axum handler with `utoipa::path` documentation.
///
/// Accepts the regular `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = ...`).
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into a crate error type.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` when not derived already.
/// * A `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant carrying a source.
/// * `From<Source>` for variants with a `source` field (or a `#[source]`/`#[from]` field).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A module-local `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a source must also declare
/// `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[waitlist_derive::waitlist_error]
/// pub enum SpreadsheetError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal spreadsheet error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn waitlist_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Turns a struct into a feature slice handle.
///
/// The fields move into a generated `<Name>Inner` struct; `<Name>` becomes a cheap
/// `Arc` handle that derefs to it and implements `FeatureSlice` so it can be
/// registered in the server state.
///
/// ```rust,ignore
/// #[waitlist_derive::waitlist_slice]
/// pub struct Registrations {
///     pub registrar: Registrar<SurrealStore>,
/// }
/// ```
#[proc_macro_attribute]
pub fn waitlist_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
