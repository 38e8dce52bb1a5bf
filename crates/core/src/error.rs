//! Unified error types for wayback-dash.
//!
//! Storage failures are split by the phase that failed (open, read, write)
//! so callers can tell "persistence unavailable" apart from a single aborted
//! transaction. Lookup misses are never errors.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the wayback-dash crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The database could not be opened or its schema could not be migrated.
    ///
    /// Every later operation retries the open, so this persists until the
    /// underlying cause (quota, permissions, newer schema) is resolved.
    #[error("STORAGE_INIT_ERROR: {0}")]
    StorageInit(String),

    /// A read transaction failed.
    #[error("STORAGE_READ_ERROR: {0}")]
    StorageRead(tokio_rusqlite::Error),

    /// A read-write transaction aborted. Nothing from it was committed.
    #[error("STORAGE_WRITE_ERROR: {0}")]
    StorageWrite(tokio_rusqlite::Error),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Archive credentials missing or rejected.
    #[error("ARCHIVE_AUTH_ERROR: {0}")]
    ArchiveAuth(String),

    /// The archive refused a capture request.
    #[error("CAPTURE_FAILED: {0}")]
    CaptureFailed(String),

    /// Archive request timed out.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl Error {
    /// Whether the failure came from the local store rather than the archive.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::StorageInit(_) | Error::StorageRead(_) | Error::StorageWrite(_))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::StorageInit(msg) => (-32001, format!("persistence unavailable: {msg}")),
            Error::StorageRead(e) => (-32002, e.to_string()),
            Error::StorageWrite(e) => (-32003, e.to_string()),
            Error::InvalidUrl(msg) => (-32004, msg.clone()),
            Error::ArchiveAuth(msg) => (-32005, msg.clone()),
            Error::CaptureFailed(msg) => (-32006, msg.clone()),
            Error::FetchTimeout(msg) => (-32007, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
