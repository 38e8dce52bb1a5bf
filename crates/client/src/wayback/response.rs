//! Archive API response types and normalization.

use chrono::{DateTime, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::wayback::ArchiveError;

/// Archive timestamp layout, e.g. `20240131235959`.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format a time the way the archive writes capture timestamps.
pub fn format_archive_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a 14-digit archive timestamp.
pub fn parse_archive_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Raw response from the availability API.
#[derive(Debug, Deserialize)]
pub struct AvailabilityApiResponse {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub archived_snapshots: ArchivedSnapshots,
}

/// Container that is `{}` when the URL has never been captured.
#[derive(Debug, Default, Deserialize)]
pub struct ArchivedSnapshots {
    #[serde(default)]
    pub closest: Option<ClosestSnapshot>,
}

/// Capture nearest to the requested time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClosestSnapshot {
    pub available: bool,
    pub status: String,
    pub timestamp: String,
    pub url: String,
}

/// Normalized availability result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub url: String,
    pub closest_snapshot: Option<ClosestSnapshot>,
}

impl From<AvailabilityApiResponse> for Availability {
    fn from(raw: AvailabilityApiResponse) -> Self {
        Availability { url: raw.url, closest_snapshot: raw.archived_snapshots.closest }
    }
}

/// One row of CDX capture history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub url_key: String,
    pub timestamp: String,
    pub original: String,
    pub mime_type: String,
    pub status_code: String,
    pub digest: String,
    pub length: String,
}

const CDX_COLUMNS: [&str; 7] = ["urlkey", "timestamp", "original", "mimetype", "statuscode", "digest", "length"];

/// Parse a CDX `output=json` body.
///
/// The body is a table whose first row names the columns. An empty body,
/// an empty table or a header-only table all mean "no history".
pub fn parse_cdx(body: &[u8]) -> Result<Vec<HistoryEntry>, ArchiveError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let rows: Vec<Vec<String>> = serde_json::from_slice(body).map_err(|e| ArchiveError::Parse(e.to_string()))?;
    let Some((header, captures)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let mut positions = [0usize; CDX_COLUMNS.len()];
    for (slot, name) in positions.iter_mut().zip(CDX_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ArchiveError::Parse(format!("CDX header missing column {name}")))?;
    }

    captures
        .iter()
        .map(|row| -> Result<HistoryEntry, ArchiveError> {
            let field = |i: usize| {
                row.get(positions[i])
                    .cloned()
                    .ok_or_else(|| ArchiveError::Parse(format!("CDX row has {} columns", row.len())))
            };
            Ok(HistoryEntry {
                url_key: field(0)?,
                timestamp: field(1)?,
                original: field(2)?,
                mime_type: field(3)?,
                status_code: field(4)?,
                digest: field(5)?,
                length: field(6)?,
            })
        })
        .collect()
}

/// Raw response from the capture endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CaptureApiResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_ext: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Normalized capture result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResult {
    /// Whether the archive accepted the capture.
    pub saved: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl From<CaptureApiResponse> for CaptureResult {
    fn from(raw: CaptureApiResponse) -> Self {
        let rejected = raw.status.as_deref() == Some("error");
        let saved = !rejected && raw.job_id.is_some();

        let message = match (raw.message, raw.status_ext) {
            (Some(message), _) if !message.is_empty() => message,
            (_, Some(ext)) if rejected => ext,
            _ if saved => format!("capture queued for {}", raw.url.as_deref().unwrap_or("url")),
            _ => "capture was not accepted".to_string(),
        };

        CaptureResult { saved, message, job_id: if saved { raw.job_id } else { None } }
    }
}
