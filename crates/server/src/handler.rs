//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::archive::{
    ArchiveAvailabilityParams, ArchiveCaptureParams, ArchiveHistoryParams, availability_impl, capture_impl,
    history_impl,
};
use crate::tools::snapshots::{
    SnapshotsDeleteParams, SnapshotsGetParams, SnapshotsSaveParams, delete_impl, get_impl, list_impl, save_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use wayback_client::ArchiveApi;
use wayback_core::{AppConfig, SnapshotStore};

/// The main MCP server handler for mcp-wayback.
#[derive(Clone)]
pub struct WaybackServer {
    tool_router: ToolRouter<Self>,
    store: SnapshotStore,
    archive: Arc<dyn ArchiveApi>,
    config: Arc<AppConfig>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl WaybackServer {
    /// Create a new server handler.
    pub fn new(store: SnapshotStore, archive: Arc<dyn ArchiveApi>, config: Arc<AppConfig>) -> Self {
        Self { tool_router: Self::tool_router(), store, archive, config }
    }

    /// Save or replace a snapshot record.
    #[tool(
        description = "Save a capture record to the local snapshot store. A record with the same id is replaced in full."
    )]
    async fn snapshots_save(&self, params: Parameters<SnapshotsSaveParams>) -> Result<CallToolResult, McpError> {
        save_impl(&self.store, params.0).await
    }

    /// Look up a snapshot record by id.
    #[tool(description = "Get a saved snapshot by id. Returns null when no record has that id.")]
    async fn snapshots_get(&self, params: Parameters<SnapshotsGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.store, params.0).await
    }

    /// List every snapshot record.
    #[tool(description = "List all saved snapshots, most recently saved first.")]
    async fn snapshots_list(&self) -> Result<CallToolResult, McpError> {
        list_impl(&self.store).await
    }

    /// Delete a snapshot record.
    ///
    /// Deleting an id that does not exist succeeds.
    #[tool(description = "Delete a saved snapshot by id. Succeeds even if the id does not exist.")]
    async fn snapshots_delete(&self, params: Parameters<SnapshotsDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(&self.store, params.0).await
    }

    /// Closest archived capture of a URL.
    #[tool(description = "Check whether the web archive holds a capture of a URL and return the closest one.")]
    async fn archive_availability(
        &self, params: Parameters<ArchiveAvailabilityParams>,
    ) -> Result<CallToolResult, McpError> {
        availability_impl(self.archive.as_ref(), params.0).await
    }

    /// Capture history of a URL.
    #[tool(description = "List archived captures of a URL, oldest first. Optional limit caps the number returned.")]
    async fn archive_history(&self, params: Parameters<ArchiveHistoryParams>) -> Result<CallToolResult, McpError> {
        history_impl(self.archive.as_ref(), &self.config, params.0).await
    }

    /// Request a new capture.
    ///
    /// Requires archive credentials in the configuration.
    #[tool(
        description = "Ask the web archive to capture a URL now. Requires WAYBACK_ACCESS_KEY and WAYBACK_SECRET_KEY. Saves a local record unless persist is false."
    )]
    async fn archive_capture(&self, params: Parameters<ArchiveCaptureParams>) -> Result<CallToolResult, McpError> {
        capture_impl(self.archive.as_ref(), &self.store, &self.config, params.0).await
    }
}

impl ServerHandler for WaybackServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-wayback".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
