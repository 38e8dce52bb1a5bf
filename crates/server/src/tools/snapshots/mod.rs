//! Saved snapshot MCP tools.
//!
//! This module exposes the snapshot store's upsert, get, list and delete
//! operations.

pub mod delete;
pub mod get;
pub mod list;
pub mod save;

pub use delete::{SnapshotsDeleteParams, delete_impl};
pub use get::{SnapshotsGetParams, get_impl};
pub use list::list_impl;
pub use save::{SnapshotsSaveParams, save_impl};
