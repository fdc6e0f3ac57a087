use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::{FxHashMap, FxHashSet};
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

const LEDGER_SCHEMA: &str = "
DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS slice ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS checksum ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS migration_slice_version ON migration FIELDS slice, version UNIQUE;
";

/// A versioned schema script owned by a feature slice.
///
/// Scripts must not manage transactions themselves; each one is wrapped in a
/// transaction together with its ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    slice: &'static str,
    version: &'static str,
    script: &'static str,
}

impl Migration {
    /// `version` is expected in the `0000-name` form so that lexical order is apply order.
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    #[must_use]
    pub const fn slice(&self) -> &'static str {
        self.slice
    }

    #[must_use]
    pub const fn version(&self) -> &'static str {
        self.version
    }

    /// Hex-encoded SHA-256 of the script text.
    #[must_use]
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }
}

#[derive(Debug, Default)]
pub(crate) struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
    migrations: &'a [Migration],
}

impl<'a> MigrationRunner<'a> {
    #[must_use]
    pub(crate) const fn new(db: &'a Surreal<Any>, migrations: &'a [Migration]) -> Self {
        Self { db, migrations }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        let mut ordered = self.migrations.to_vec();
        ensure_well_formed(&ordered)?;
        ordered.sort_by(|a, b| (a.slice, a.version).cmp(&(b.slice, b.version)));

        self.db
            .query(LEDGER_SCHEMA)
            .await
            .context("Defining migration ledger")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let applied = self.applied_map().await?;
        let mut report = MigrationReport::default();

        for migration in &ordered {
            let checksum = migration.checksum();
            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, &existing.checksum, &checksum)?;
                report.skipped.push(migration.key());
                continue;
            }

            self.apply(migration, checksum).await?;
            report.applied.push(migration.key());
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration, checksum: String) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum }} RETURN NONE;
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", checksum))
            .await
            .context(format!("SQL execution failed at {}", migration.key()))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Statement rejected at {}", migration.key()))?;

        Ok(())
    }

    async fn applied_map(&self) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing migrations map")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}

fn ensure_well_formed(migrations: &[Migration]) -> Result<(), DatabaseError> {
    let mut seen = FxHashSet::default();
    for migration in migrations {
        if !seen.insert(migration.key()) {
            return Err(DatabaseError::Migration {
                message: format!("Duplicate migration {}", migration.key()).into(),
                context: None,
            });
        }

        let script = migration.script.to_lowercase();
        if script.contains("begin transaction") || script.contains("commit transaction") {
            return Err(DatabaseError::Migration {
                message: format!("Manual transaction control in {}", migration.key()).into(),
                context: Some("The migration runner handles transactions".into()),
            });
        }
    }
    Ok(())
}

fn ensure_checksum_match(
    migration: &Migration,
    existing: &str,
    current: &str,
) -> Result<(), DatabaseError> {
    if existing != current {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (expected {existing}, got {current})",
                migration.key()
            )
            .into(),
            context: Some("Migration already applied with different checksum".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_sha256_hex() {
        let migration = Migration::new("registration", "0001-init", "");
        assert_eq!(
            migration.checksum(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn duplicate_versions_are_rejected() {
        let migrations = [
            Migration::new("registration", "0001-init", "DEFINE TABLE a;"),
            Migration::new("registration", "0001-init", "DEFINE TABLE b;"),
        ];
        assert!(matches!(ensure_well_formed(&migrations), Err(DatabaseError::Migration { .. })));
    }

    #[test]
    fn manual_transactions_are_rejected() {
        let migrations =
            [Migration::new("registration", "0001-init", "BEGIN TRANSACTION; COMMIT TRANSACTION;")];
        assert!(ensure_well_formed(&migrations).is_err());
    }
}
