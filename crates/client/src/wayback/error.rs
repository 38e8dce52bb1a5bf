//! Archive client error types.

use std::sync::Arc;

/// Errors from the archive availability, CDX and capture endpoints.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArchiveError {
    /// Target URL is empty, malformed, or not http(s).
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Capture requested without an access key or secret key.
    #[error("missing credentials: access key and secret key are required")]
    MissingCredentials,

    /// The archive rejected the credentials.
    #[error("authentication failed: credentials rejected")]
    AuthError,

    /// The archive refused the capture submission.
    #[error("capture submission failed: {0}")]
    SubmissionFailed(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ArchiveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ArchiveError::Timeout } else { ArchiveError::Network(Arc::new(err)) }
    }
}
