//! Database schema migrations.
//!
//! Uses a version table to track applied migrations. Each migration is a SQL
//! batch embedded at compile time; the schema version is the highest applied
//! migration number, independent of SQLite's own `user_version`.

use super::Error;
use tokio_rusqlite::rusqlite::{self, TransactionBehavior};
use tokio_rusqlite::{Connection, params};

/// Migration list: (version, SQL).
///
/// Versions are strictly increasing. Bump only on breaking schema changes.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_saved_snapshots.sql"))];

/// Schema version this build reads and writes.
pub const SCHEMA_VERSION: i64 = 1;

/// What a migration run found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Version recorded before this run (0 for a brand-new database).
    pub previous: i64,
    /// Versions applied by this run, in order.
    pub applied: Vec<i64>,
}

impl MigrationReport {
    /// Version the database is at after this run.
    pub fn current(&self) -> i64 {
        self.applied.last().copied().unwrap_or(self.previous)
    }
}

/// Run any pending migrations.
///
/// The version check and every pending migration run inside one immediate
/// transaction, so two processes opening the same file cannot both apply
/// version 1, and a failure leaves the previous version intact.
///
/// # Errors
///
/// Returns `Error::StorageInit` if a migration fails or the database was
/// written by a newer schema version than [`SCHEMA_VERSION`].
pub async fn run(conn: &Connection) -> Result<MigrationReport, Error> {
    let applied_at = chrono::Utc::now().to_rfc3339();

    let report = conn
        .call(move |conn| -> Result<MigrationReport, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS _migrations (
                    version INTEGER PRIMARY KEY,
                    applied_at TEXT NOT NULL
                )",
                [],
            )?;

            let previous = current_version(&tx)?;
            if previous > SCHEMA_VERSION {
                return Ok(MigrationReport { previous, applied: Vec::new() });
            }

            let mut applied = Vec::new();
            for (version, sql) in MIGRATIONS {
                if *version > previous {
                    tx.execute_batch(sql)?;
                    tx.execute(
                        "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                        params![version, applied_at],
                    )?;
                    applied.push(*version);
                }
            }

            tx.commit()?;
            Ok(MigrationReport { previous, applied })
        })
        .await
        .map_err(|e| Error::StorageInit(format!("migration failed: {e}")))?;

    if report.previous > SCHEMA_VERSION {
        return Err(Error::StorageInit(format!(
            "database schema version {} is newer than supported version {SCHEMA_VERSION}",
            report.previous
        )));
    }

    for version in &report.applied {
        tracing::info!(version, "applied schema migration");
    }

    Ok(report)
}

/// Highest applied migration, or 0 if none.
pub(crate) fn current_version(conn: &rusqlite::Connection) -> Result<i64, rusqlite::Error> {
    conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))
}
