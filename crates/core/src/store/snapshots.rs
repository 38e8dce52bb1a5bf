//! Saved snapshot operations.
//!
//! Upsert, point lookup, list-all and delete over the `saved_snapshots`
//! table. Each call is its own transaction.

use super::connection::SnapshotStore;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, TransactionBehavior};

/// A capture the user chose to keep.
///
/// `title`, `status` and `archive_url` are carried verbatim; the store never
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedSnapshot {
    pub id: String,
    pub original_url: String,
    /// Archive capture time, `YYYYMMDDhhmmss`.
    pub timestamp: String,
    /// Local write time in epoch milliseconds. Only used for ordering.
    pub saved_at: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub archive_url: Option<String>,
}

const SELECT_COLUMNS: &str =
    "SELECT id, original_url, timestamp, saved_at, title, status, archive_url FROM saved_snapshots";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SavedSnapshot> {
    Ok(SavedSnapshot {
        id: row.get(0)?,
        original_url: row.get(1)?,
        timestamp: row.get(2)?,
        saved_at: row.get(3)?,
        title: row.get(4)?,
        status: row.get(5)?,
        archive_url: row.get(6)?,
    })
}

/// Order by `saved_at`, newest first. Stable, so ties keep read order.
fn sort_newest_first(snapshots: &mut [SavedSnapshot]) {
    snapshots.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
}

impl SnapshotStore {
    /// Insert a snapshot, or replace the stored one with the same id.
    ///
    /// Replacement is total: every column takes the new value, including
    /// optional fields that are now `None`.
    ///
    /// # Errors
    ///
    /// Returns `Error::StorageWrite` if the transaction aborts; the previous
    /// record (or its absence) is left untouched.
    pub async fn upsert(&self, snapshot: &SavedSnapshot) -> Result<(), Error> {
        let snapshot = snapshot.clone();
        let id = snapshot.id.clone();

        self.conn()
            .await?
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                tx.execute(
                    "INSERT INTO saved_snapshots (
                        id, original_url, timestamp, saved_at, title, status, archive_url
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    ON CONFLICT(id) DO UPDATE SET
                        original_url = excluded.original_url,
                        timestamp = excluded.timestamp,
                        saved_at = excluded.saved_at,
                        title = excluded.title,
                        status = excluded.status,
                        archive_url = excluded.archive_url",
                    params![
                        &snapshot.id,
                        &snapshot.original_url,
                        &snapshot.timestamp,
                        snapshot.saved_at,
                        &snapshot.title,
                        &snapshot.status,
                        &snapshot.archive_url,
                    ],
                )?;
                tx.commit()
            })
            .await
            .map_err(Error::StorageWrite)?;

        tracing::debug!(%id, "upserted saved snapshot");
        Ok(())
    }

    /// Get a snapshot by id.
    ///
    /// Returns `None` if no snapshot has that id.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<SavedSnapshot>, Error> {
        let id = id.to_string();
        self.conn()
            .await?
            .call(move |conn| -> Result<Option<SavedSnapshot>, rusqlite::Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;

                match stmt.query_row(params![id], from_row) {
                    Ok(s) => Ok(Some(s)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(Error::StorageRead)
    }

    /// Every saved snapshot, most recently saved first.
    ///
    /// Rows are read in storage order and sorted afterwards; neither index
    /// covers `saved_at`.
    pub async fn list_all(&self) -> Result<Vec<SavedSnapshot>, Error> {
        let mut snapshots = self
            .conn()
            .await?
            .call(|conn| -> Result<Vec<SavedSnapshot>, rusqlite::Error> {
                let mut stmt = conn.prepare(SELECT_COLUMNS)?;
                let rows = stmt.query_map([], from_row)?;
                rows.collect()
            })
            .await
            .map_err(Error::StorageRead)?;

        sort_newest_first(&mut snapshots);
        Ok(snapshots)
    }

    /// Delete a snapshot by id. Deleting an unknown id succeeds.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), Error> {
        let id = id.to_string();

        let (id, deleted) = self
            .conn()
            .await?
            .call(move |conn| -> Result<(String, usize), rusqlite::Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let deleted = tx.execute("DELETE FROM saved_snapshots WHERE id = ?1", params![id])?;
                tx.commit()?;
                Ok((id, deleted))
            })
            .await
            .map_err(Error::StorageWrite)?;

        tracing::debug!(%id, deleted, "deleted saved snapshot");
        Ok(())
    }
}
