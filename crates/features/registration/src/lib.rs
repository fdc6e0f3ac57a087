//! # Registration
//!
//! The waitlist's feature slice. It validates submissions, stores them in the
//! `registration` table and mirrors every accepted one into the XLSX export.
//!
//! Routes:
//! * `POST /api/register`, `GET /api/register`
//! * `GET /api/export-excel` (incremental file), `GET /api/excel-export` (rendered from the store)
//! * `GET /api/reference/countries`, `GET /api/reference/industries`

mod error;
mod handlers;
pub mod models;
mod repository;
mod workflow;

pub use crate::error::{RegistrationError, RegistrationErrorExt};
pub use crate::handlers::router;
pub use crate::repository::{RegistrationStore, SurrealStore};
pub use crate::workflow::Registrar;

use waitlist_database::{Database, Migration};
use waitlist_domain::config::ApiConfig;
use waitlist_domain::validation::RegistrationSchema;
use waitlist_kernel::domain::registry::InitializedSlice;
use waitlist_spreadsheet::Spreadsheet;

/// Schema of the `registration` table, applied by the database builder at startup.
pub static MIGRATIONS: &[Migration] = &[Migration::new(
    "registration",
    "0001-registration",
    include_str!("../migrations/0001-registration.surql"),
)];

/// Registration feature state
#[waitlist_derive::waitlist_slice]
pub struct Registrations {
    pub registrar: Registrar<SurrealStore>,
}

/// Initialize the registration feature.
///
/// `database` must have been opened with [`MIGRATIONS`].
///
/// # Errors
///
/// Returns [`RegistrationError::Config`] when the export file or sheet name is empty.
pub async fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<InitializedSlice, RegistrationError> {
    let export = &config.export;
    if export.file_name.trim().is_empty() || export.sheet_name.trim().is_empty() {
        return Err(RegistrationError::Config {
            message: "Export file and sheet names cannot be empty".into(),
            context: Some("export".into()),
        });
    }

    let spreadsheet = Spreadsheet::builder()
        .dir(&export.dir)
        .file_name(&export.file_name)
        .sheet_name(&export.sheet_name)
        .open()
        .await;
    let schema = RegistrationSchema::with_strict_regions(config.registration.strict_regions);

    tracing::info!(
        export = %spreadsheet.path().display(),
        strict_regions = schema.is_strict(),
        "Registration server slice initialized"
    );

    let inner = RegistrationsInner {
        registrar: Registrar::new(SurrealStore::new(database.clone()), spreadsheet, schema),
    };

    Ok(InitializedSlice::new(Registrations::new(inner)))
}
