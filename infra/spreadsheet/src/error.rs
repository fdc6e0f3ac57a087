use std::borrow::Cow;

/// A specialized [`SpreadsheetError`] enum of this crate.
#[waitlist_derive::waitlist_error]
pub enum SpreadsheetError {
    #[error("Spreadsheet I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Workbook decoding failed{}: {source}", format_context(.context))]
    Decode { source: calamine::XlsxError, context: Option<Cow<'static, str>> },

    #[error("Workbook encoding failed{}: {source}", format_context(.context))]
    Encode { source: rust_xlsxwriter::XlsxError, context: Option<Cow<'static, str>> },

    #[error("Blocking workbook task failed{}: {source}", format_context(.context))]
    Task { source: tokio::task::JoinError, context: Option<Cow<'static, str>> },

    #[error("Internal spreadsheet error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
