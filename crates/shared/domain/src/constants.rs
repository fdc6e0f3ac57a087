/// `SurrealDB` table holding registrations.
pub const REGISTRATION_TABLE: &str = "registration";

/// OpenAPI tags.
pub const SYSTEM_TAG: &str = "System";
pub const REGISTRATION_TAG: &str = "Registration";
pub const EXPORT_TAG: &str = "Export";
pub const REFERENCE_TAG: &str = "Reference";

/// Length of generated registration identifiers.
pub const REGISTRATION_ID_LEN: usize = 12;
