use crate::models::{ErrorResponse, FieldIssue};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::borrow::Cow;
use waitlist_database::DatabaseError;
use waitlist_domain::validation::ValidationErrors;
use waitlist_spreadsheet::SpreadsheetError;

/// A specialized [`RegistrationError`] enum of this crate.
#[waitlist_derive::waitlist_error]
pub enum RegistrationError {
    /// The submission broke one or more field rules.
    #[error("Validation failed{}: {issues}", format_context(.context))]
    Validation { issues: ValidationErrors, context: Option<Cow<'static, str>> },

    /// The request body is not JSON.
    #[error("Invalid JSON body{}: {message}", format_context(.context))]
    InvalidBody { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The normalized email is already registered.
    #[error("Duplicate registration{}: {email}", format_context(.context))]
    Duplicate { email: String, context: Option<Cow<'static, str>> },

    /// The persistence store failed.
    #[error("Registration store error{}: {source}", format_context(.context))]
    Store { source: DatabaseError, context: Option<Cow<'static, str>> },

    /// No export file has been written yet.
    #[error("Export file not found{}: {path}", format_context(.context))]
    ExportMissing { path: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The workbook could not be produced.
    #[error("Export error{}: {source}", format_context(.context))]
    Export { source: SpreadsheetError, context: Option<Cow<'static, str>> },

    /// The slice was configured with unusable settings.
    #[error("Registration config error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal registration error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<ValidationErrors> for RegistrationError {
    fn from(issues: ValidationErrors) -> Self {
        Self::Validation { issues, context: None }
    }
}

impl From<surrealdb::Error> for RegistrationError {
    fn from(source: surrealdb::Error) -> Self {
        Self::Store { source: source.into(), context: None }
    }
}

impl RegistrationError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            Self::Duplicate { .. } => StatusCode::CONFLICT,
            Self::ExportMissing { .. } => StatusCode::NOT_FOUND,
            Self::Store { .. } | Self::Export { .. } | Self::Config { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Builds the HTTP response, using `fallback` as the body of server-side failures.
    ///
    /// Server-side failures are logged here; their text never reaches the client.
    #[must_use]
    pub fn respond(self, fallback: &'static str) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation { issues, .. } => ErrorResponse::with_details(
                "Validation failed",
                issues.issues().iter().map(FieldIssue::from).collect(),
            ),
            Self::InvalidBody { .. } => ErrorResponse::new("Invalid JSON body"),
            Self::Duplicate { .. } => ErrorResponse::new("User with this email already exists"),
            Self::ExportMissing { .. } => ErrorResponse::new("Excel file not found."),
            internal => {
                tracing::error!(error = %internal, "Registration request failed");
                ErrorResponse::new(fallback)
            },
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        self.respond("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};
    use waitlist_domain::validation::RegistrationSchema;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn validation_errors_list_every_issue() {
        let issues = RegistrationSchema::new()
            .parse(&json!({ "fullName": "A", "age": 10 }))
            .expect_err("invalid submission");
        let response = RegistrationError::from(issues).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body["error"], "Validation failed");
        let details = body["details"].as_array().expect("details");
        assert!(details.iter().any(|d| d["field"] == "fullName"));
        assert!(details.iter().any(|d| d["field"] == "age"));
    }

    #[tokio::test]
    async fn server_failures_hide_their_cause() {
        let err = RegistrationError::from("socket closed by peer");
        let response = err.respond("Failed to fetch users");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, json!({ "error": "Failed to fetch users" }));
    }

    #[test]
    fn client_errors_map_to_4xx() {
        let duplicate = RegistrationError::Duplicate { email: "a@b.io".into(), context: None };
        let missing = RegistrationError::ExportMissing { path: "exports".into(), context: None };

        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
