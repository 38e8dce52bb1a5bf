//! archive_availability tool implementation.
//!
//! Looks up the archive's closest capture of a URL.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wayback_client::ArchiveApi;

use super::archive_error;
use crate::tools::{json_result, require_non_empty};

/// Parameters for the archive_availability tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveAvailabilityParams {
    /// The URL to look up.
    pub url: String,
}

/// Implementation of the archive_availability tool.
pub async fn availability_impl(
    archive: &dyn ArchiveApi, params: ArchiveAvailabilityParams,
) -> Result<CallToolResult, McpError> {
    require_non_empty("url", &params.url)?;

    let availability = archive.availability(&params.url).await.map_err(archive_error)?;

    json_result(&availability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{archive::stub::StubArchive, output_json};

    #[tokio::test]
    async fn test_availability_impl() {
        let archive = StubArchive::default();
        let result = availability_impl(&archive, ArchiveAvailabilityParams { url: "example.com".into() })
            .await
            .unwrap();

        let output = output_json(&result);
        assert_eq!(output["closestSnapshot"]["available"], true);
        assert_eq!(output["closestSnapshot"]["timestamp"], "20240101000000");
    }

    #[tokio::test]
    async fn test_availability_impl_invalid_url() {
        let archive = StubArchive::default();
        let blank = availability_impl(&archive, ArchiveAvailabilityParams { url: "".into() }).await;
        assert_eq!(blank.unwrap_err().code.0, -32602);

        let ftp = availability_impl(&archive, ArchiveAvailabilityParams { url: "ftp://example.com".into() }).await;
        assert_eq!(ftp.unwrap_err().code.0, -32004);
    }
}
