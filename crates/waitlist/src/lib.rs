//! Facade crate for the waitlist features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `waitlist` with the `server` feature.
//! - Open the database with every script in [`MIGRATIONS`], then call `waitlist::init`
//!   to build the feature slices.

pub use waitlist_domain as domain;
pub use waitlist_kernel as kernel;
#[cfg(feature = "server")]
pub use waitlist_registration as registration;

#[cfg(feature = "server")]
use waitlist_database::{Database, Migration};
#[cfg(feature = "server")]
use waitlist_domain::config::ApiConfig;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use waitlist_kernel::server::router::system_router;
        pub use waitlist_registration::router as registration_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "server")]
        "registration",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Schema scripts of every enabled slice, in dependency order.
#[cfg(feature = "server")]
pub static MIGRATIONS: &[&[Migration]] = &[waitlist_registration::MIGRATIONS];

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub async fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    // Registration
    slices.push(registration::init(config, database).await?);

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::features;

    #[test]
    fn unknown_features_are_disabled() {
        assert!(!features::is_enabled("billing"));
        assert_eq!(features::is_enabled("registration"), cfg!(feature = "server"));
    }
}
