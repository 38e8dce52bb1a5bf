//! SQLite-backed store for saved archive captures.
//!
//! A small durable object store with async access via tokio-rusqlite:
//!
//! - One collection (`saved_snapshots`) keyed by `id`
//! - Non-unique secondary indexes on `timestamp` and `original_url`
//! - Versioned schema migrations applied once at open
//! - Lazy, single-flight open shared by every clone of the store

pub mod connection;
pub mod hash;
pub mod migrations;
pub mod snapshots;

pub use crate::Error;

pub use connection::{Location, SnapshotStore};
pub use hash::snapshot_id;
pub use migrations::SCHEMA_VERSION;
pub use snapshots::SavedSnapshot;
