use chrono::{SecondsFormat, Utc};

/// Header row of the sheet, in column order.
pub const COLUMNS: [&str; 7] =
    ["fullName", "age", "email", "country", "state", "industry", "registrationDate"];

/// One registration as it appears in the exported sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetRow {
    pub full_name: String,
    pub age: i64,
    pub email: String,
    pub country: String,
    pub state: String,
    pub industry: String,
    /// RFC 3339 UTC timestamp of the export, not of the registration itself.
    pub registration_date: String,
}

impl SheetRow {
    /// Builds a row stamped with the current export time.
    #[must_use]
    pub fn exported_now(
        full_name: impl Into<String>,
        age: i64,
        email: impl Into<String>,
        country: impl Into<String>,
        state: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            age,
            email: email.into(),
            country: country.into(),
            state: state.into(),
            industry: industry.into(),
            registration_date: export_timestamp(),
        }
    }

    pub(crate) fn text_cells(&self) -> [(u16, &str); 6] {
        [
            (0, self.full_name.as_str()),
            (2, self.email.as_str()),
            (3, self.country.as_str()),
            (4, self.state.as_str()),
            (5, self.industry.as_str()),
            (6, self.registration_date.as_str()),
        ]
    }
}

#[must_use]
pub fn export_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
