//! snapshots_get tool implementation.
//!
//! Retrieves a saved snapshot by id. An unknown id yields `null`, not an error.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wayback_core::{SavedSnapshot, SnapshotStore};

use crate::tools::{json_result, require_non_empty};

/// Parameters for the snapshots_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotsGetParams {
    /// The id of the saved snapshot to retrieve.
    pub id: String,
}

/// Output from the snapshots_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotsGetOutput {
    /// The saved snapshot, or null when no record has this id.
    pub snapshot: Option<SavedSnapshot>,
}

/// Implementation of the snapshots_get tool.
pub async fn get_impl(store: &SnapshotStore, params: SnapshotsGetParams) -> Result<CallToolResult, McpError> {
    require_non_empty("id", &params.id)?;

    let snapshot = store.get_by_id(&params.id).await?;

    json_result(&SnapshotsGetOutput { snapshot })
}
