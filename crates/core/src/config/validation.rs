//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, MAX_HISTORY_LIMIT};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn check_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid { field: field.into(), reason };

    let parsed = url::Url::parse(value).map_err(|e| invalid(format!("not a valid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("unsupported scheme: {scheme}"))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("must include a host".into()));
    }

    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `api_base_url` or `web_base_url` is not an http(s) URL
    /// - `history_limit` is 0 or exceeds 10000
    /// - `db_path` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        for (field, value) in [("api_base_url", &self.api_base_url), ("web_base_url", &self.web_base_url)] {
            check_base_url(field, value)?;
        }

        if self.history_limit == 0 || self.history_limit > MAX_HISTORY_LIMIT {
            return Err(ConfigError::Invalid {
                field: "history_limit".into(),
                reason: format!("must be between 1 and {MAX_HISTORY_LIMIT}"),
            });
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_path".into(), reason: "must not be empty".into() });
        }

        if self.access_key.is_some() != self.secret_key.is_some() {
            tracing::warn!("only one of access_key and secret_key is set; archive captures will be rejected");
        }

        Ok(())
    }
}
