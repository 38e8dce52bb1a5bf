//! snapshots_save tool implementation.
//!
//! Stores a capture record, replacing any record with the same id.

use chrono::Utc;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wayback_core::{SavedSnapshot, SnapshotStore, snapshot_id};

use crate::tools::{json_result, require_non_empty};

/// Parameters for the snapshots_save tool.
///
/// Field names match [`SavedSnapshot`], so a record read back from the store
/// can be saved again as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotsSaveParams {
    /// Record id. Defaults to a hash of `originalUrl` and `timestamp`.
    #[serde(default)]
    pub id: Option<String>,

    /// The URL that was archived.
    pub original_url: String,

    /// Archive capture time (YYYYMMDDhhmmss).
    pub timestamp: String,

    /// Local save time in epoch milliseconds. Defaults to now.
    #[serde(default)]
    pub saved_at: Option<i64>,

    /// Optional page title.
    #[serde(default)]
    pub title: Option<String>,

    /// Optional capture status (e.g. HTTP status code).
    #[serde(default)]
    pub status: Option<String>,

    /// Optional replay URL.
    #[serde(default)]
    pub archive_url: Option<String>,
}

/// Output from the snapshots_save tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotsSaveOutput {
    /// The record as stored.
    pub snapshot: SavedSnapshot,
}

/// Implementation of the snapshots_save tool.
pub async fn save_impl(store: &SnapshotStore, params: SnapshotsSaveParams) -> Result<CallToolResult, McpError> {
    require_non_empty("original_url", &params.original_url)?;
    require_non_empty("timestamp", &params.timestamp)?;

    let id = match params.id {
        Some(id) => {
            require_non_empty("id", &id)?;
            id
        }
        None => snapshot_id(&params.original_url, &params.timestamp),
    };

    let snapshot = SavedSnapshot {
        id,
        original_url: params.original_url,
        timestamp: params.timestamp,
        saved_at: params.saved_at.unwrap_or_else(|| Utc::now().timestamp_millis()),
        title: params.title,
        status: params.status,
        archive_url: params.archive_url,
    };

    store.upsert(&snapshot).await?;

    json_result(&SnapshotsSaveOutput { snapshot })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::output_json;
    use crate::tools::snapshots::{SnapshotsGetParams, get_impl};

    fn params(url: &str) -> SnapshotsSaveParams {
        SnapshotsSaveParams {
            original_url: url.to_string(),
            timestamp: "20240101000000".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_derives_id_and_saved_at() {
        let store = SnapshotStore::in_memory();
        let before = Utc::now().timestamp_millis();

        let result = save_impl(&store, params("https://example.com/")).await.unwrap();
        let output = output_json(&result);

        let id = snapshot_id("https://example.com/", "20240101000000");
        assert_eq!(output["snapshot"]["id"], id.as_str());
        assert!(output["snapshot"]["savedAt"].as_i64().unwrap() >= before);

        let stored = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.original_url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_save_with_explicit_id_replaces() {
        let store = SnapshotStore::in_memory();
        let first = SnapshotsSaveParams {
            id: Some("a".into()),
            saved_at: Some(1),
            title: Some("old".into()),
            ..params("x")
        };
        let second = SnapshotsSaveParams { id: Some("a".into()), saved_at: Some(2), ..params("y") };

        save_impl(&store, first).await.unwrap();
        save_impl(&store, second).await.unwrap();

        let stored = store.get_by_id("a").await.unwrap().unwrap();
        assert_eq!(stored.original_url, "y");
        assert_eq!(stored.saved_at, 2);
        assert!(stored.title.is_none());
    }

    #[tokio::test]
    async fn test_save_accepts_record_from_get() {
        let store = SnapshotStore::in_memory();
        let first = SnapshotsSaveParams {
            saved_at: Some(1),
            title: Some("Example".into()),
            archive_url: Some("https://web.archive.org/web/20240101000000/https://example.com/".into()),
            ..params("https://example.com/")
        };
        let saved = output_json(&save_impl(&store, first).await.unwrap());

        let id = saved["snapshot"]["id"].as_str().unwrap().to_string();
        let fetched = output_json(&get_impl(&store, SnapshotsGetParams { id: id.clone() }).await.unwrap());

        let mut record = fetched["snapshot"].clone();
        record["title"] = serde_json::json!("Renamed");
        let params: SnapshotsSaveParams = serde_json::from_value(record).unwrap();
        assert_eq!(params.original_url, "https://example.com/");
        assert_eq!(params.saved_at, Some(1));

        save_impl(&store, params).await.unwrap();

        let stored = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.title.as_deref(), Some("Renamed"));
        assert_eq!(stored.saved_at, 1);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[test]
    fn test_params_use_camel_case() {
        let params: SnapshotsSaveParams = serde_json::from_value(serde_json::json!({
            "id": "a",
            "originalUrl": "https://e.com/",
            "timestamp": "20240101000000",
            "savedAt": 1
        }))
        .unwrap();
        assert_eq!(params.original_url, "https://e.com/");
        assert_eq!(params.saved_at, Some(1));
    }

    #[tokio::test]
    async fn test_save_rejects_blank_fields() {
        let store = SnapshotStore::in_memory();
        assert!(save_impl(&store, params(" ")).await.is_err());

        let blank_id = SnapshotsSaveParams { id: Some(String::new()), ..params("https://example.com/") };
        assert!(save_impl(&store, blank_id).await.is_err());
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
