//! Request and response bodies of the registration routes.

use chrono::{DateTime, Utc};
use waitlist_derive::api_model;
use waitlist_domain::reference::Country;
use waitlist_domain::registration::Registration;
use waitlist_domain::validation::ValidationIssue;

/// Registration form submission.
///
/// Documentation only: the handler validates the raw JSON so that every field
/// problem is reported at once.
#[api_model(deny_unknown_fields = false)]
pub struct RegistrationRequest {
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    #[schema(example = 36, minimum = 13, maximum = 120)]
    pub age: i64,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "GB")]
    pub country: String,
    #[schema(example = "England")]
    pub state: String,
    #[schema(example = "Technology")]
    pub industry: String,
}

/// Short confirmation of a stored registration.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Registration> for RegistrationReceipt {
    fn from(registration: &Registration) -> Self {
        Self {
            id: registration.id.clone(),
            full_name: registration.full_name.clone(),
            email: registration.email.clone(),
            created_at: registration.created_at,
        }
    }
}

#[api_model]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegistrationReceipt,
}

/// A stored registration as returned by the listing.
#[api_model]
pub struct RegistrationDto {
    pub id: String,
    pub full_name: String,
    pub age: i64,
    pub email: String,
    pub country: String,
    pub state: String,
    pub industry: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationDto {
    fn from(registration: Registration) -> Self {
        Self {
            id: registration.id,
            full_name: registration.full_name,
            age: registration.age,
            email: registration.email,
            country: registration.country,
            state: registration.state,
            industry: registration.industry,
            created_at: registration.created_at,
            updated_at: registration.updated_at,
        }
    }
}

/// Every registration, newest first.
#[api_model]
pub struct UsersResponse {
    pub users: Vec<RegistrationDto>,
}

/// One failed field rule.
#[api_model]
pub struct FieldIssue {
    #[schema(example = "email")]
    pub field: String,
    #[schema(example = "Please provide a valid email address")]
    pub message: String,
}

impl From<&ValidationIssue> for FieldIssue {
    fn from(issue: &ValidationIssue) -> Self {
        Self { field: issue.field.key().to_owned(), message: issue.message.to_owned() }
    }
}

/// Error body shared by every registration route.
#[api_model]
pub struct ErrorResponse {
    pub error: String,
    /// Present for validation failures only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), details: None }
    }

    pub fn with_details(error: impl Into<String>, details: Vec<FieldIssue>) -> Self {
        Self { error: error.into(), details: Some(details) }
    }
}

/// A selectable country with its regions.
#[api_model]
pub struct CountryDto {
    #[schema(example = "CA")]
    pub code: String,
    #[schema(example = "Canada")]
    pub name: String,
    pub states: Vec<String>,
}

impl From<&Country> for CountryDto {
    fn from(country: &Country) -> Self {
        Self {
            code: country.code.to_owned(),
            name: country.name.to_owned(),
            states: country.states.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}
