//! Archive request types and target URL validation.

use serde::Serialize;

use crate::wayback::ArchiveError;

/// Canonicalize a target URL before asking the archive about it.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, ArchiveError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ArchiveError::InvalidUrl("empty URL".to_string()));
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| ArchiveError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ArchiveError::InvalidUrl(format!("unsupported scheme: {scheme}"))),
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_lowercase();
        parsed
            .set_host(Some(&host))
            .map_err(|e| ArchiveError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Query string for the availability endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityQuery {
    pub url: String,
}

/// Query string for the CDX history endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryQuery {
    pub url: String,
    pub output: &'static str,
    pub limit: u32,
}

impl HistoryQuery {
    pub fn new(url: &url::Url, limit: u32) -> Self {
        Self { url: url.to_string(), output: "json", limit }
    }
}

/// Form body for a capture submission.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureRequest {
    pub url: String,
}

/// Build the `Authorization` header value for capture requests.
///
/// # Errors
///
/// Returns `ArchiveError::MissingCredentials` if either key is empty.
pub fn authorization(access_key: &str, secret_key: &str) -> Result<String, ArchiveError> {
    let (access_key, secret_key) = (access_key.trim(), secret_key.trim());
    if access_key.is_empty() || secret_key.is_empty() {
        return Err(ArchiveError::MissingCredentials);
    }
    Ok(format!("LOW {access_key}:{secret_key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://EXAMPLE.COM/Path").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/Path");
    }

    #[test]
    fn test_canonicalize_remove_fragment_keep_query() {
        let url = canonicalize("  https://example.com/a?b=1&a=2#top ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a?b=1&a=2");
    }

    #[test]
    fn test_canonicalize_rejects_other_schemes() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(ArchiveError::InvalidUrl(msg)) if msg.contains("scheme")));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize("   "), Err(ArchiveError::InvalidUrl(_))));
    }

    #[test]
    fn test_history_query_serializes() {
        let url = canonicalize("example.com").unwrap();
        let query = HistoryQuery::new(&url, 50);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["url"], "https://example.com/");
        assert_eq!(json["output"], "json");
        assert_eq!(json["limit"], 50);
    }

    #[test]
    fn test_authorization_header() {
        assert_eq!(authorization("key", "secret").unwrap(), "LOW key:secret");
    }

    #[test]
    fn test_authorization_requires_both_keys() {
        assert!(matches!(authorization("", "secret"), Err(ArchiveError::MissingCredentials)));
        assert!(matches!(authorization("key", "  "), Err(ArchiveError::MissingCredentials)));
    }
}
