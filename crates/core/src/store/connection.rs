//! Lazily opened database handle with pragma configuration.
//!
//! The handle is opened on first use. Concurrent first callers share a single
//! open + migrate sequence; everyone after that sees the initialized
//! connection.

use super::migrations;
use crate::Error;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tokio::sync::OnceCell;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

static SHARED: OnceLock<SnapshotStore> = OnceLock::new();

/// Where the database lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// SQLite file on disk, created on first open.
    File(PathBuf),
    /// Private in-memory database, gone when the store is dropped.
    Memory,
}

/// Durable store of saved archive captures.
///
/// Cloning is cheap and every clone shares the same underlying handle.
/// Operations open the database transparently; callers never manage the
/// connection themselves.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    location: Location,
    conn: OnceCell<Connection>,
}

impl SnapshotStore {
    /// Create a store backed by the file at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_location(Location::File(path.into()))
    }

    /// Create a store backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self::with_location(Location::Memory)
    }

    fn with_location(location: Location) -> Self {
        Self { inner: Arc::new(Inner { location, conn: OnceCell::new() }) }
    }

    /// Process-wide store.
    ///
    /// The first call fixes the path; later calls return the same store and
    /// ignore their argument.
    pub fn shared(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = SHARED.get_or_init(|| Self::new(path.clone()));
        if store.location() != &Location::File(path.clone()) {
            tracing::warn!(requested = %path.display(), "shared snapshot store already bound to another path");
        }
        store.clone()
    }

    /// Where this store keeps its data.
    pub fn location(&self) -> &Location {
        &self.inner.location
    }

    /// Whether the database handle has been opened.
    pub fn is_open(&self) -> bool {
        self.inner.conn.initialized()
    }

    /// Open the database if it is not open yet.
    ///
    /// Idempotent and safe to call concurrently: only one open and migration
    /// sequence runs. A failed open leaves the store closed so the next call
    /// tries again.
    ///
    /// # Errors
    ///
    /// Returns `Error::StorageInit` if SQLite refuses to open the database or
    /// the schema cannot be created or upgraded.
    pub async fn open(&self) -> Result<(), Error> {
        self.conn().await.map(|_| ())
    }

    /// Schema version recorded in the database.
    pub async fn schema_version(&self) -> Result<i64, Error> {
        self.conn()
            .await?
            .call(|conn| migrations::current_version(conn))
            .await
            .map_err(Error::StorageRead)
    }

    pub(crate) async fn conn(&self) -> Result<&Connection, Error> {
        self.inner
            .conn
            .get_or_try_init(|| connect(&self.inner.location))
            .await
    }
}

async fn connect(location: &Location) -> Result<Connection, Error> {
    let conn = match location {
        Location::File(path) => Connection::open(path)
            .await
            .map_err(|e| Error::StorageInit(format!("cannot open {}: {e}", path.display())))?,
        Location::Memory => Connection::open_in_memory()
            .await
            .map_err(|e| Error::StorageInit(format!("cannot open in-memory database: {e}")))?,
    };

    conn.call(|conn| conn.execute_batch(PRAGMAS))
        .await
        .map_err(|e| Error::StorageInit(format!("cannot configure database: {e}")))?;

    let report = migrations::run(&conn).await?;

    tracing::debug!(
        location = ?location,
        schema_version = report.current(),
        migrated = !report.applied.is_empty(),
        "snapshot store opened"
    );

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory() {
        let store = SnapshotStore::in_memory();
        assert!(!store.is_open());

        store.open().await.unwrap();
        assert!(store.is_open());

        let version = store
            .conn()
            .await
            .unwrap()
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_open_twice_is_noop() {
        let store = SnapshotStore::in_memory();
        store.open().await.unwrap();
        store.open().await.unwrap();

        assert_eq!(store.schema_version().await.unwrap(), migrations::SCHEMA_VERSION);
        let count: i64 = store
            .conn()
            .await
            .unwrap()
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_open_shares_one_handle() {
        let store = SnapshotStore::in_memory();
        let a = store.clone();
        let b = store.clone();

        let (ra, rb) = tokio::join!(a.open(), b.open());
        ra.unwrap();
        rb.unwrap();

        // In-memory databases are per connection, so a second open would
        // have produced an empty, separately migrated database.
        let first = store.conn().await.unwrap() as *const Connection;
        let second = a.conn().await.unwrap() as *const Connection;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("missing").join("db.sqlite"));

        let result = store.open().await;
        assert!(matches!(&result, Err(Error::StorageInit(msg)) if msg.contains("db.sqlite")));
        assert!(!store.is_open());
    }

    #[tokio::test]
    async fn test_failed_open_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("later");
        let store = SnapshotStore::new(nested.join("db.sqlite"));

        assert!(store.open().await.is_err());

        std::fs::create_dir(&nested).unwrap();
        store.open().await.unwrap();
        assert!(store.is_open());
    }

    #[tokio::test]
    async fn test_open_non_database_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.sqlite");
        std::fs::write(&path, vec![0xAB; 4096]).unwrap();

        let store = SnapshotStore::new(path.clone());
        assert!(matches!(store.open().await, Err(Error::StorageInit(_))));
    }

    #[test]
    fn test_shared_returns_same_store() {
        let a = SnapshotStore::shared("./shared-test.sqlite");
        let b = SnapshotStore::shared("./ignored.sqlite");
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
        assert_eq!(b.location(), &Location::File(PathBuf::from("./shared-test.sqlite")));
    }
}
