//! snapshots_list tool implementation.
//!
//! Lists every saved snapshot, most recently saved first.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wayback_core::{SavedSnapshot, SnapshotStore};

use crate::tools::json_result;

/// Output from the snapshots_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotsListOutput {
    /// Saved snapshots ordered by save time, newest first.
    pub snapshots: Vec<SavedSnapshot>,
    /// Number of snapshots returned.
    pub count: usize,
}

/// Implementation of the snapshots_list tool.
pub async fn list_impl(store: &SnapshotStore) -> Result<CallToolResult, McpError> {
    let snapshots = store.list_all().await?;
    let count = snapshots.len();

    json_result(&SnapshotsListOutput { snapshots, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::output_json;

    fn make_snapshot(id: &str, saved_at: i64) -> SavedSnapshot {
        SavedSnapshot {
            id: id.to_string(),
            original_url: format!("https://example.com/{id}"),
            timestamp: "20240101000000".to_string(),
            saved_at,
            title: None,
            status: None,
            archive_url: None,
        }
    }

    #[tokio::test]
    async fn test_list_impl_empty() {
        let store = SnapshotStore::in_memory();
        let output = output_json(&list_impl(&store).await.unwrap());
        assert_eq!(output["count"], 0);
        assert_eq!(output["snapshots"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_list_impl_newest_first() {
        let store = SnapshotStore::in_memory();
        for (id, saved_at) in [("mid", 3), ("newest", 5), ("oldest", 1)] {
            store.upsert(&make_snapshot(id, saved_at)).await.unwrap();
        }

        let output: SnapshotsListOutput = serde_json::from_value(output_json(&list_impl(&store).await.unwrap())).unwrap();
        let ids: Vec<&str> = output.snapshots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "mid", "oldest"]);
        assert_eq!(output.count, 3);
    }
}
