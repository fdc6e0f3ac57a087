use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submission that passed validation, with the email lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub full_name: String,
    pub age: i64,
    pub email: String,
    pub country: String,
    pub state: String,
    pub industry: String,
}

/// A persisted registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
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
