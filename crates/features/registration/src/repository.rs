//! Persistence of registrations.

use crate::error::RegistrationError;
use chrono::{DateTime, Utc};
use std::future::Future;
use surrealdb::types::SurrealValue;
use tracing::instrument;
use waitlist_database::{Database, DatabaseErrorExt};
use waitlist_domain::registration::{NewRegistration, Registration};
use waitlist_kernel::safe_nanoid;

/// Storage seam of the registration workflow.
///
/// Implementations must enforce email uniqueness themselves and report a
/// violation as [`RegistrationError::Duplicate`], so that two racing inserts
/// of the same address cannot both succeed.
pub trait RegistrationStore: Send + Sync {
    /// Looks up a registration by its already-normalized email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Registration>, RegistrationError>> + Send;

    /// Stores a new registration; the store assigns the id and both timestamps.
    fn insert(
        &self,
        registration: &NewRegistration,
    ) -> impl Future<Output = Result<Registration, RegistrationError>> + Send;

    /// Every registration, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Registration>, RegistrationError>> + Send;
}

const FIND_BY_EMAIL: &str = "
    SELECT uid, full_name, age, email, country, state, industry,
        <string> created_at AS created_at, <string> updated_at AS updated_at
    FROM registration WHERE email = $email LIMIT 1;";

const INSERT: &str = "
    CREATE registration CONTENT {
        uid: $uid,
        full_name: $full_name,
        age: $age,
        email: $email,
        country: $country,
        state: $state,
        industry: $industry,
        created_at: time::now(),
        updated_at: time::now()
    } RETURN NONE;
    SELECT uid, full_name, age, email, country, state, industry,
        <string> created_at AS created_at, <string> updated_at AS updated_at
    FROM registration WHERE uid = $uid;";

const LIST: &str = "
    SELECT uid, full_name, age, email, country, state, industry,
        <string> created_at AS created_at, <string> updated_at AS updated_at
    FROM registration;";

#[derive(Debug, SurrealValue)]
struct RegistrationRecord {
    uid: String,
    full_name: String,
    age: i64,
    email: String,
    country: String,
    state: String,
    industry: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<RegistrationRecord> for Registration {
    type Error = RegistrationError;

    fn try_from(record: RegistrationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: parse_timestamp(&record.created_at)?,
            updated_at: parse_timestamp(&record.updated_at)?,
            id: record.uid,
            full_name: record.full_name,
            age: record.age,
            email: record.email,
            country: record.country,
            state: record.state,
            industry: record.industry,
        })
    }
}

/// Accepts both the bare RFC 3339 form and the `d'…'` literal form of a cast datetime.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RegistrationError> {
    let trimmed = raw.strip_prefix('d').unwrap_or(raw).trim_matches(['\'', '"']);
    DateTime::parse_from_rfc3339(trimmed).map(|ts| ts.with_timezone(&Utc)).map_err(|e| {
        RegistrationError::Internal {
            message: format!("Unreadable timestamp '{raw}': {e}").into(),
            context: None,
        }
    })
}

fn into_registrations(
    records: Vec<RegistrationRecord>,
) -> Result<Vec<Registration>, RegistrationError> {
    records.into_iter().map(Registration::try_from).collect()
}

/// [`RegistrationStore`] backed by the `registration` table.
#[derive(Debug, Clone)]
pub struct SurrealStore {
    database: Database,
}

impl SurrealStore {
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }
}

impl RegistrationStore for SurrealStore {
    #[instrument(skip_all)]
    async fn find_by_email(&self, email: &str) -> Result<Option<Registration>, RegistrationError> {
        let records = self
            .database
            .query(FIND_BY_EMAIL)
            .bind(("email", email.to_owned()))
            .await
            .context("Looking up registration by email")?
            .take::<Vec<RegistrationRecord>>(0)
            .context("Decoding registration")?;

        Ok(into_registrations(records)?.into_iter().next())
    }

    #[instrument(skip_all)]
    async fn insert(&self, registration: &NewRegistration) -> Result<Registration, RegistrationError> {
        let uid = safe_nanoid!();
        let response = self
            .database
            .query(INSERT)
            .bind(("uid", uid.clone()))
            .bind(("full_name", registration.full_name.clone()))
            .bind(("age", registration.age))
            .bind(("email", registration.email.clone()))
            .bind(("country", registration.country.clone()))
            .bind(("state", registration.state.clone()))
            .bind(("industry", registration.industry.clone()))
            .await
            .context("Inserting registration")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Insert rejected");

        let mut response = match response {
            Ok(response) => response,
            Err(err) if err.is_unique_violation() => {
                return Err(RegistrationError::Duplicate {
                    email: registration.email.clone(),
                    context: Some("Unique index rejected the insert".into()),
                });
            },
            Err(err) => return Err(err.into()),
        };

        let records = response
            .take::<Vec<RegistrationRecord>>(1)
            .context("Decoding inserted registration")?;

        into_registrations(records)?.into_iter().next().ok_or_else(|| {
            RegistrationError::Internal {
                message: format!("Registration {uid} missing after insert").into(),
                context: None,
            }
        })
    }

    #[instrument(skip_all)]
    async fn list(&self) -> Result<Vec<Registration>, RegistrationError> {
        let records = self
            .database
            .query(LIST)
            .await
            .context("Listing registrations")?
            .take::<Vec<RegistrationRecord>>(0)
            .context("Decoding registrations")?;

        let mut registrations = into_registrations(records)?;
        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(registrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_parse_in_both_cast_forms() {
        let bare = parse_timestamp("2025-03-01T10:15:30.123456789Z").expect("bare");
        let literal = parse_timestamp("d'2025-03-01T10:15:30.123456789Z'").expect("literal");
        assert_eq!(bare, literal);
    }

    #[test]
    fn garbage_timestamp_is_internal_error() {
        assert!(matches!(parse_timestamp("yesterday"), Err(RegistrationError::Internal { .. })));
    }
}
