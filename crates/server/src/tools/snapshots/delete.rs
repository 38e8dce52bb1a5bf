//! snapshots_delete tool implementation.
//!
//! Deletes a saved snapshot by id. Deleting an unknown id succeeds.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wayback_core::SnapshotStore;

use crate::tools::{json_result, require_non_empty};

/// Parameters for the snapshots_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotsDeleteParams {
    /// The id of the saved snapshot to delete.
    pub id: String,
}

/// Output from the snapshots_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotsDeleteOutput {
    /// The id that was deleted.
    pub id: String,
    /// Always true once the delete committed, whether or not the id existed.
    pub deleted: bool,
}

/// Implementation of the snapshots_delete tool.
pub async fn delete_impl(store: &SnapshotStore, params: SnapshotsDeleteParams) -> Result<CallToolResult, McpError> {
    require_non_empty("id", &params.id)?;

    store.delete_by_id(&params.id).await?;

    json_result(&SnapshotsDeleteOutput { id: params.id, deleted: true })
}
