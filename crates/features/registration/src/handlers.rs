use crate::Registrations;
use crate::error::RegistrationError;
use crate::models::{
    CountryDto, ErrorResponse, RegisterResponse, RegistrationDto, RegistrationRequest,
    UsersResponse,
};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use waitlist_derive::api_handler;
use waitlist_domain::constants::{EXPORT_TAG, REFERENCE_TAG, REGISTRATION_TAG};
use waitlist_domain::reference::{COUNTRIES, INDUSTRIES};
use waitlist_spreadsheet::XLSX_MIME;

/// Routes of the registration slice, bound to `slice` so they merge into any router state.
pub fn router<S>(slice: Registrations) -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    OpenApiRouter::new()
        .routes(routes!(register_handler, list_handler))
        .routes(routes!(download_handler))
        .routes(routes!(export_handler))
        .routes(routes!(countries_handler))
        .routes(routes!(industries_handler))
        .with_state(slice)
}

#[api_handler(
    post,
    path = "/api/register",
    request_body = RegistrationRequest,
    responses(
        (status = CREATED, description = "Registration stored", body = RegisterResponse),
        (status = BAD_REQUEST, description = "Malformed body or failed validation", body = ErrorResponse),
        (status = CONFLICT, description = "Email already registered", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Unexpected failure", body = ErrorResponse),
    ),
    tag = REGISTRATION_TAG,
)]
pub(crate) async fn register_handler(
    State(slice): State<Registrations>,
    body: Bytes,
) -> Result<(StatusCode, Json<RegisterResponse>), RegistrationError> {
    let input = serde_json::from_slice::<Value>(&body).map_err(|e| {
        RegistrationError::InvalidBody { message: e.to_string().into(), context: None }
    })?;

    let user = slice.registrar.register(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { message: "Registration successful".to_owned(), user }),
    ))
}

#[api_handler(
    get,
    path = "/api/register",
    responses(
        (status = OK, description = "All registrations, newest first", body = UsersResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Store unavailable", body = ErrorResponse),
    ),
    tag = REGISTRATION_TAG,
)]
pub(crate) async fn list_handler(
    State(slice): State<Registrations>,
) -> Result<Json<UsersResponse>, Response> {
    let users = slice
        .registrar
        .list()
        .await
        .map_err(|err| err.respond("Failed to fetch users"))?;

    Ok(Json(UsersResponse { users: users.into_iter().map(RegistrationDto::from).collect() }))
}

#[api_handler(
    get,
    path = "/api/export-excel",
    responses(
        (status = OK, description = "Incrementally maintained workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", body = Vec<u8>),
        (status = NOT_FOUND, description = "Nothing exported yet", body = ErrorResponse),
    ),
    tag = EXPORT_TAG,
)]
pub(crate) async fn download_handler(
    State(slice): State<Registrations>,
) -> Result<Response, RegistrationError> {
    let bytes = slice.registrar.download().await?;
    Ok(attachment(slice.registrar.spreadsheet().file_name(), bytes))
}

#[api_handler(
    get,
    path = "/api/excel-export",
    responses(
        (status = OK, description = "Workbook rendered from the store", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet", body = Vec<u8>),
        (status = INTERNAL_SERVER_ERROR, description = "Store or encoder failure", body = ErrorResponse),
    ),
    tag = EXPORT_TAG,
)]
pub(crate) async fn export_handler(
    State(slice): State<Registrations>,
) -> Result<Response, RegistrationError> {
    let bytes = slice.registrar.export_snapshot().await?;
    Ok(attachment(slice.registrar.spreadsheet().file_name(), bytes))
}

#[api_handler(
    get,
    path = "/api/reference/countries",
    responses((status = OK, description = "Selectable countries and their regions", body = Vec<CountryDto>)),
    tag = REFERENCE_TAG,
)]
pub(crate) async fn countries_handler() -> Json<Vec<CountryDto>> {
    Json(COUNTRIES.iter().map(CountryDto::from).collect())
}

#[api_handler(
    get,
    path = "/api/reference/industries",
    responses((status = OK, description = "Suggested industry names", body = Vec<String>)),
    tag = REFERENCE_TAG,
)]
pub(crate) async fn industries_handler() -> Json<&'static [&'static str]> {
    Json(INDUSTRIES)
}

fn attachment(file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_owned()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        bytes,
    )
        .into_response()
}
