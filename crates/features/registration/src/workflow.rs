//! Orchestration of a submission: validate, deduplicate, store, mirror to the sheet.

use crate::error::{RegistrationError, RegistrationErrorExt};
use crate::models::RegistrationReceipt;
use crate::repository::RegistrationStore;
use chrono::SecondsFormat;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use waitlist_domain::registration::{NewRegistration, Registration};
use waitlist_domain::validation::RegistrationSchema;
use waitlist_spreadsheet::{SheetRow, Spreadsheet};

/// Runs registrations against a store and keeps the export sheet in step.
#[derive(Debug, Clone)]
pub struct Registrar<S> {
    store: S,
    spreadsheet: Spreadsheet,
    schema: RegistrationSchema,
}

impl<S: RegistrationStore> Registrar<S> {
    pub const fn new(store: S, spreadsheet: Spreadsheet, schema: RegistrationSchema) -> Self {
        Self { store, spreadsheet, schema }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn spreadsheet(&self) -> &Spreadsheet {
        &self.spreadsheet
    }

    pub const fn schema(&self) -> &RegistrationSchema {
        &self.schema
    }

    /// Validates and stores one submission.
    ///
    /// The spreadsheet append runs after the store accepted the registration;
    /// its failure is logged and does not affect the result.
    ///
    /// # Errors
    /// * [`RegistrationError::Validation`] with every failed rule; nothing is stored.
    /// * [`RegistrationError::Duplicate`] when the email is already registered,
    ///   including a concurrent insert of the same address.
    /// * [`RegistrationError::Store`] when the store is unavailable.
    #[instrument(skip_all)]
    pub async fn register(&self, input: &Value) -> Result<RegistrationReceipt, RegistrationError> {
        let submission = self.schema.parse(input)?;

        if self.store.find_by_email(&submission.email).await?.is_some() {
            debug!("Email already registered");
            return Err(RegistrationError::Duplicate { email: submission.email, context: None });
        }

        let registration = self.store.insert(&submission).await?;
        info!(id = %registration.id, "Registration stored");

        if let Err(err) = self.spreadsheet.append(sheet_row(&submission)).await {
            warn!(id = %registration.id, error = %err, "Spreadsheet append failed, registration kept");
        }

        Ok(RegistrationReceipt::from(&registration))
    }

    /// Every registration, newest first.
    ///
    /// # Errors
    /// Returns [`RegistrationError::Store`] when the store is unavailable.
    pub async fn list(&self) -> Result<Vec<Registration>, RegistrationError> {
        self.store.list().await
    }

    /// The incrementally maintained export file.
    ///
    /// # Errors
    /// Returns [`RegistrationError::ExportMissing`] when no file exists or it cannot be read.
    pub async fn download(&self) -> Result<Vec<u8>, RegistrationError> {
        let missing = || RegistrationError::ExportMissing {
            path: self.spreadsheet.path().display().to_string().into(),
            context: None,
        };

        match self.spreadsheet.read_bytes().await {
            Ok(Some(bytes)) => Ok(bytes),
            Ok(None) => Err(missing()),
            Err(err) => {
                warn!(error = %err, "Export file unreadable");
                Err(missing())
            },
        }
    }

    /// A workbook rendered from the store's current contents, with
    /// `registrationDate` set to each registration's creation time.
    ///
    /// # Errors
    /// Returns [`RegistrationError::Store`] or [`RegistrationError::Export`].
    pub async fn export_snapshot(&self) -> Result<Vec<u8>, RegistrationError> {
        let rows = self.store.list().await?.into_iter().map(snapshot_row).collect::<Vec<_>>();
        debug!(rows = rows.len(), "Rendering export snapshot");

        self.spreadsheet.render(rows).await.context("Rendering export snapshot")
    }
}

fn sheet_row(submission: &NewRegistration) -> SheetRow {
    SheetRow::exported_now(
        &submission.full_name,
        submission.age,
        &submission.email,
        &submission.country,
        &submission.state,
        &submission.industry,
    )
}

fn snapshot_row(registration: Registration) -> SheetRow {
    SheetRow {
        registration_date: registration.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        full_name: registration.full_name,
        age: registration.age,
        email: registration.email,
        country: registration.country,
        state: registration.state,
        industry: registration.industry,
    }
}
