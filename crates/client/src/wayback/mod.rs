//! Web archive API client.
//!
//! Thin client for the three archive endpoints the dashboard consumes.
//!
//! ### Endpoints
//!
//! - **Availability**: `GET {api_base}/wayback/available?url=` returns the
//!   capture closest to now, or nothing.
//! - **History**: `GET {web_base}/cdx/search/cdx?url=&output=json&limit=`
//!   returns a header row followed by one row per capture.
//! - **Capture**: `POST {web_base}/save` with `Authorization: LOW key:secret`
//!   queues a new capture.
//!
//! Requests are made once. Failures are returned to the caller as typed
//! [`ArchiveError`]s; nothing is retried here.

pub mod error;
pub mod request;
pub mod response;

pub use error::ArchiveError;
pub use request::{AvailabilityQuery, CaptureRequest, HistoryQuery, authorization, canonicalize};
pub use response::{
    Availability, CaptureResult, ClosestSnapshot, HistoryEntry, format_archive_timestamp, parse_archive_timestamp,
    parse_cdx,
};

use reqwest::{StatusCode, header};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the availability API.
const DEFAULT_API_BASE_URL: &str = "https://archive.org";

/// Default base URL for CDX and capture endpoints.
const DEFAULT_WEB_BASE_URL: &str = "https://web.archive.org";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "wayback-dash/0.1";

/// Archive client configuration.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Base URL for the availability API (default: https://archive.org).
    pub api_base_url: String,
    /// Base URL for CDX and capture (default: https://web.archive.org).
    pub web_base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: wayback-dash/0.x).
    pub user_agent: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            web_base_url: DEFAULT_WEB_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Archive operations the dashboard depends on.
///
/// Lets the tool layer run against a stub in tests.
#[async_trait::async_trait]
pub trait ArchiveApi: Send + Sync {
    /// Closest capture of `url`, if any.
    async fn availability(&self, url: &str) -> Result<Availability, ArchiveError>;

    /// Capture history of `url`, oldest first. Empty when never captured.
    async fn history(&self, url: &str, limit: u32) -> Result<Vec<HistoryEntry>, ArchiveError>;

    /// Ask the archive to capture `url` now.
    async fn capture(&self, url: &str, access_key: &str, secret_key: &str) -> Result<CaptureResult, ArchiveError>;
}

/// HTTP archive client.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    http: reqwest::Client,
    config: Arc<ArchiveConfig>,
}

impl ArchiveClient {
    /// Create a new archive client with the given configuration.
    pub fn new(config: ArchiveConfig) -> Result<Self, ArchiveError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ArchiveError::Network(Arc::new(e)))?;

        Ok(Self { http, config: Arc::new(config) })
    }

    fn endpoint(base: &str, path: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), path)
    }
}

/// Map a response status to the error the caller should see.
///
/// 401/403 mean rejected credentials; on the capture endpoint any other
/// failure status is a refused submission.
pub fn check_status(status: StatusCode, submitting: bool) -> Result<(), ArchiveError> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ArchiveError::AuthError);
    }

    if submitting {
        return Err(ArchiveError::SubmissionFailed(format!("archive responded with HTTP {}", status.as_u16())));
    }

    Err(ArchiveError::HttpError { status: status.as_u16() })
}

#[async_trait::async_trait]
impl ArchiveApi for ArchiveClient {
    async fn availability(&self, url: &str) -> Result<Availability, ArchiveError> {
        let target = canonicalize(url)?;
        let start = Instant::now();

        tracing::debug!("checking archive availability: url={}", target);

        let http_response = self
            .http
            .get(Self::endpoint(&self.config.api_base_url, "wayback/available"))
            .header(header::ACCEPT, "application/json")
            .query(&AvailabilityQuery { url: target.to_string() })
            .send()
            .await?;

        check_status(http_response.status(), false)?;

        let bytes = http_response.bytes().await?;
        let raw: response::AvailabilityApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| ArchiveError::Parse(e.to_string()))?;
        let availability = Availability::from(raw);

        tracing::debug!(
            "availability completed in {:?}, captured={}",
            start.elapsed(),
            availability.closest_snapshot.is_some()
        );

        Ok(availability)
    }

    async fn history(&self, url: &str, limit: u32) -> Result<Vec<HistoryEntry>, ArchiveError> {
        let target = canonicalize(url)?;
        let start = Instant::now();

        tracing::debug!("querying capture history: url={}, limit={}", target, limit);

        let http_response = self
            .http
            .get(Self::endpoint(&self.config.web_base_url, "cdx/search/cdx"))
            .query(&HistoryQuery::new(&target, limit))
            .send()
            .await?;

        check_status(http_response.status(), false)?;

        let bytes = http_response.bytes().await?;
        let entries = parse_cdx(&bytes)?;

        tracing::debug!("history completed in {:?}, {} captures", start.elapsed(), entries.len());

        Ok(entries)
    }

    async fn capture(&self, url: &str, access_key: &str, secret_key: &str) -> Result<CaptureResult, ArchiveError> {
        let auth = authorization(access_key, secret_key)?;
        let target = canonicalize(url)?;

        tracing::debug!("submitting capture: url={}", target);

        let http_response = self
            .http
            .post(Self::endpoint(&self.config.web_base_url, "save"))
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, auth)
            .form(&CaptureRequest { url: target.to_string() })
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("capture response status: {}", status);
        check_status(status, true)?;

        let bytes = http_response.bytes().await?;
        let raw: response::CaptureApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| ArchiveError::Parse(e.to_string()))?;
        let result = CaptureResult::from(raw);

        if !result.saved {
            tracing::warn!("archive did not accept capture of {}: {}", target, result.message);
        }

        Ok(result)
    }
}
