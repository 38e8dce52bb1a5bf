//! Core types and shared functionality for wayback-dash.
//!
//! This crate provides:
//! - Saved snapshot store with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod store;

pub use config::{AppConfig, ConfigError, MAX_HISTORY_LIMIT};
pub use error::Error;
pub use store::{SavedSnapshot, SnapshotStore, snapshot_id};
