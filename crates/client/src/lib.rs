//! Client code for wayback-dash.
//!
//! This crate provides the HTTP client for the web archive's availability,
//! CDX history and capture endpoints, behind the [`ArchiveApi`] trait.

pub mod wayback;

pub use wayback::{
    ArchiveApi, ArchiveClient, ArchiveConfig, ArchiveError, Availability, CaptureResult, ClosestSnapshot,
    HistoryEntry, format_archive_timestamp, parse_archive_timestamp,
};
