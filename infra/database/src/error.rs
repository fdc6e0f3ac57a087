use std::borrow::Cow;

/// A specialized [`DatabaseError`] enum of this crate.
#[waitlist_derive::waitlist_error]
pub enum DatabaseError {
    /// Validation errors.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Occurs when connectivity or health checks fail.
    #[error("Database connection failed{}: {message}", format_context(.context))]
    Connection { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Occurs when authentication fails.
    #[error("Authentication failed{}: {message}", format_context(.context))]
    Auth { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A wrapper for underlying `SurrealDB` engine errors.
    #[error("SurrealDB error{}: {source}", format_context(.context))]
    Surreal {
        #[source]
        source: surrealdb::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Migration failures or invariant violations.
    #[error("Migration error{}: {message}", format_context(.context))]
    Migration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal database error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Fragment of the engine's `IndexExists` message:
/// ``Database index `{index}` already contains {value}, with record `{record}` ``.
/// Matched as text, so a rewording in an engine release breaks duplicate detection.
const UNIQUE_VIOLATION_FRAGMENT: &str = "already contains";

impl DatabaseError {
    /// `true` when the engine rejected a write because a unique index already holds the value.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Surreal { source, .. } => source.to_string().contains(UNIQUE_VIOLATION_FRAGMENT),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_engine_errors_can_be_unique_violations() {
        let err = DatabaseError::Validation { message: UNIQUE_VIOLATION_FRAGMENT.into(), context: None };
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn context_is_rendered_in_message() {
        let err: Result<(), DatabaseError> =
            Err(DatabaseError::Connection { message: "Unhealthy".into(), context: None });
        let err = err.context("mem://").unwrap_err();
        assert_eq!(err.to_string(), "Database connection failed (mem://): Unhealthy");
    }
}
