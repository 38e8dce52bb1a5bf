//! Archive lookup MCP tools.
//!
//! These tools call the remote archive. Only `archive_capture` touches the
//! snapshot store, and only after the archive accepted the capture.

pub mod availability;
pub mod capture;
pub mod history;

pub use availability::{ArchiveAvailabilityParams, availability_impl};
pub use capture::{ArchiveCaptureParams, capture_impl};
pub use history::{ArchiveHistoryParams, history_impl};

use wayback_client::ArchiveError;
use wayback_core::Error;

/// Map an archive client failure onto the unified error codes.
pub(crate) fn archive_error(err: ArchiveError) -> Error {
    match err {
        ArchiveError::InvalidUrl(msg) => Error::InvalidUrl(msg),
        ArchiveError::MissingCredentials | ArchiveError::AuthError => Error::ArchiveAuth(err.to_string()),
        ArchiveError::SubmissionFailed(msg) => Error::CaptureFailed(msg),
        ArchiveError::Timeout => Error::FetchTimeout(err.to_string()),
        ArchiveError::HttpError { status } => Error::HttpError(format!("HTTP {status}")),
        ArchiveError::Network(_) | ArchiveError::Parse(_) => Error::HttpError(err.to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_mapping() {
        assert!(matches!(archive_error(ArchiveError::InvalidUrl("x".into())), Error::InvalidUrl(_)));
        assert!(matches!(archive_error(ArchiveError::MissingCredentials), Error::ArchiveAuth(_)));
        assert!(matches!(archive_error(ArchiveError::AuthError), Error::ArchiveAuth(_)));
        assert!(matches!(archive_error(ArchiveError::SubmissionFailed("no".into())), Error::CaptureFailed(_)));
        assert!(matches!(archive_error(ArchiveError::Timeout), Error::FetchTimeout(_)));
        assert!(
            matches!(archive_error(ArchiveError::HttpError { status: 502 }), Error::HttpError(msg) if msg == "HTTP 502")
        );
        assert!(matches!(archive_error(ArchiveError::Parse("bad".into())), Error::HttpError(_)));
    }
}
