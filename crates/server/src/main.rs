//! mcp-wayback server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;
use wayback_client::{ArchiveClient, ArchiveConfig};
use wayback_core::{AppConfig, SnapshotStore};

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    tracing::info!("Starting mcp-wayback server on stdio transport");

    let store = SnapshotStore::shared(&config.db_path);
    // Snapshot tools retry the open on each call and report the failure there.
    if let Err(e) = store.open().await {
        tracing::error!(path = %config.db_path.display(), "snapshot store unavailable: {}", e);
    }

    let archive = ArchiveClient::new(ArchiveConfig {
        api_base_url: config.api_base_url.clone(),
        web_base_url: config.web_base_url.clone(),
        timeout: config.timeout(),
        user_agent: config.user_agent.clone(),
    })?;

    let handler = handler::WaybackServer::new(store, Arc::new(archive), Arc::new(config));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
