//! archive_history tool implementation.
//!
//! Lists the archive's captures of a URL.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wayback_client::{ArchiveApi, HistoryEntry};
use wayback_core::{AppConfig, Error, MAX_HISTORY_LIMIT};

use super::archive_error;
use crate::tools::{json_result, require_non_empty};

/// Parameters for the archive_history tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveHistoryParams {
    /// The URL whose captures to list.
    pub url: String,

    /// Maximum number of captures, 1 to 10000 (default from configuration).
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Output from the archive_history tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveHistoryOutput {
    /// The URL that was queried.
    pub url: String,
    /// Captures, oldest first.
    pub captures: Vec<HistoryEntry>,
    /// Number of captures returned.
    pub count: usize,
}

/// Implementation of the archive_history tool.
pub async fn history_impl(
    archive: &dyn ArchiveApi, config: &AppConfig, params: ArchiveHistoryParams,
) -> Result<CallToolResult, McpError> {
    require_non_empty("url", &params.url)?;

    let limit = params.limit.unwrap_or(config.history_limit);
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        return Err(Error::InvalidInput(format!("limit must be between 1 and {MAX_HISTORY_LIMIT}")).into());
    }

    let captures = archive.history(&params.url, limit).await.map_err(archive_error)?;
    let count = captures.len();

    json_result(&ArchiveHistoryOutput { url: params.url, captures, count })
}
