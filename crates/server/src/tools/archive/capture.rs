//! archive_capture tool implementation.
//!
//! Asks the archive to capture a URL and, once accepted, saves a record of
//! the capture in the snapshot store.

use chrono::Utc;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wayback_client::{ArchiveApi, CaptureResult, format_archive_timestamp, wayback::canonicalize};
use wayback_core::{AppConfig, Error, SavedSnapshot, SnapshotStore, snapshot_id};

use super::archive_error;
use crate::tools::{json_result, require_non_empty};

/// Parameters for the archive_capture tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveCaptureParams {
    /// The URL to capture.
    pub url: String,

    /// Save a record of the capture locally (default: true).
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Optional title stored with the record.
    #[serde(default)]
    pub title: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Output from the archive_capture tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveCaptureOutput {
    /// What the archive said about the submission.
    pub capture: CaptureResult,
    /// The stored record, when one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SavedSnapshot>,
    /// Why the record could not be stored, if saving failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

/// Implementation of the archive_capture tool.
///
/// A capture the archive accepted is never reported as failed just because
/// the local save failed; the storage error is returned alongside it.
pub async fn capture_impl(
    archive: &dyn ArchiveApi, store: &SnapshotStore, config: &AppConfig, params: ArchiveCaptureParams,
) -> Result<CallToolResult, McpError> {
    require_non_empty("url", &params.url)?;

    let (access_key, secret_key) = config
        .require_credentials()
        .map_err(|e| Error::ArchiveAuth(e.to_string()))?;

    let target = canonicalize(&params.url).map_err(archive_error)?;
    let requested_at = Utc::now();

    let capture = archive
        .capture(target.as_str(), access_key, secret_key)
        .await
        .map_err(archive_error)?;

    let mut output = ArchiveCaptureOutput { capture, snapshot: None, persist_error: None };
    if !(params.persist && output.capture.saved) {
        return json_result(&output);
    }

    let timestamp = format_archive_timestamp(requested_at);
    let snapshot = SavedSnapshot {
        id: snapshot_id(target.as_str(), &timestamp),
        original_url: target.to_string(),
        archive_url: Some(format!("{}/web/{timestamp}/{target}", config.web_base_url.trim_end_matches('/'))),
        timestamp,
        saved_at: Utc::now().timestamp_millis(),
        title: params.title,
        status: Some("submitted".to_string()),
    };

    match store.upsert(&snapshot).await {
        Ok(()) => output.snapshot = Some(snapshot),
        Err(e) => {
            tracing::warn!("capture accepted but not saved locally: {}", e);
            output.persist_error = Some(e.to_string());
        }
    }

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{archive::stub::StubArchive, output_json};
    use wayback_client::ArchiveError;

    fn config_with_keys() -> AppConfig {
        AppConfig { access_key: Some("key".into()), secret_key: Some("secret".into()), ..Default::default() }
    }

    fn params(url: &str) -> ArchiveCaptureParams {
        ArchiveCaptureParams { url: url.to_string(), persist: true, title: Some("Example".into()) }
    }

    #[tokio::test]
    async fn test_capture_impl_persists_accepted_capture() {
        let archive = StubArchive::default();
        let store = SnapshotStore::in_memory();

        let result = capture_impl(&archive, &store, &config_with_keys(), params("EXAMPLE.com/page#x"))
            .await
            .unwrap();
        let output: ArchiveCaptureOutput = serde_json::from_value(output_json(&result)).unwrap();

        assert!(output.capture.saved);
        let snapshot = output.snapshot.unwrap();
        assert_eq!(snapshot.original_url, "https://example.com/page");
        assert_eq!(snapshot.title.as_deref(), Some("Example"));
        assert_eq!(snapshot.timestamp.len(), 14);
        assert_eq!(
            snapshot.archive_url.as_deref(),
            Some(format!("https://web.archive.org/web/{}/https://example.com/page", snapshot.timestamp).as_str())
        );

        let stored = store.list_all().await.unwrap();
        assert_eq!(stored, vec![snapshot]);
        assert_eq!(*archive.captured_urls.lock().unwrap(), vec!["https://example.com/page".to_string()]);
    }

    #[tokio::test]
    async fn test_capture_impl_without_persist() {
        let archive = StubArchive::default();
        let store = SnapshotStore::in_memory();
        let params = ArchiveCaptureParams { persist: false, ..params("https://example.com") };

        let output = output_json(&capture_impl(&archive, &store, &config_with_keys(), params).await.unwrap());
        assert!(output.get("snapshot").is_none());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capture_impl_rejected_capture_not_persisted() {
        let archive = StubArchive {
            capture: Some(Ok(CaptureResult { saved: false, message: "limit reached".into(), job_id: None })),
            ..Default::default()
        };
        let store = SnapshotStore::in_memory();

        let output = output_json(&capture_impl(&archive, &store, &config_with_keys(), params("https://example.com")).await.unwrap());
        assert_eq!(output["capture"]["saved"], false);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capture_impl_missing_credentials() {
        let archive = StubArchive::default();
        let store = SnapshotStore::in_memory();

        let result = capture_impl(&archive, &store, &AppConfig::default(), params("https://example.com")).await;
        let err = result.unwrap_err();
        assert_eq!(err.code.0, -32005);
        assert!(archive.captured_urls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capture_impl_submission_error() {
        let archive = StubArchive {
            capture: Some(Err(ArchiveError::SubmissionFailed("HTTP 429".into()))),
            ..Default::default()
        };
        let store = SnapshotStore::in_memory();

        let err = capture_impl(&archive, &store, &config_with_keys(), params("https://example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32006);
    }

    #[tokio::test]
    async fn test_capture_impl_reports_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let archive = StubArchive::default();
        let store = SnapshotStore::new(dir.path().join("missing").join("db.sqlite"));

        let output = output_json(&capture_impl(&archive, &store, &config_with_keys(), params("https://example.com")).await.unwrap());
        assert_eq!(output["capture"]["saved"], true);
        assert!(output["persistError"].as_str().unwrap().contains("STORAGE_INIT_ERROR"));
        assert!(output.get("snapshot").is_none());
    }
}
