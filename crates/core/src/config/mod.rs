//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WAYBACK_*)
//! 2. TOML config file (if WAYBACK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Largest capture history a single request may ask for.
pub const MAX_HISTORY_LIMIT: u32 = 10_000;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WAYBACK_*)
/// 2. TOML config file (if WAYBACK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database holding saved snapshots.
    ///
    /// Set via WAYBACK_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for archive requests.
    ///
    /// Set via WAYBACK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via WAYBACK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Base URL of the availability API.
    ///
    /// Set via WAYBACK_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the CDX and capture endpoints.
    ///
    /// Set via WAYBACK_WEB_BASE_URL environment variable.
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    /// Maximum rows requested from the CDX history endpoint.
    ///
    /// Set via WAYBACK_HISTORY_LIMIT environment variable.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Archive account access key for capture requests.
    ///
    /// Set via WAYBACK_ACCESS_KEY environment variable.
    #[serde(default)]
    pub access_key: Option<String>,

    /// Archive account secret key for capture requests.
    ///
    /// Set via WAYBACK_SECRET_KEY environment variable.
    #[serde(default)]
    pub secret_key: Option<String>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./wayback-snapshots.sqlite")
}

fn default_user_agent() -> String {
    "wayback-dash/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_api_base_url() -> String {
    "https://archive.org".into()
}

fn default_web_base_url() -> String {
    "https://web.archive.org".into()
}

fn default_history_limit() -> u32 {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            api_base_url: default_api_base_url(),
            web_base_url: default_web_base_url(),
            history_limit: default_history_limit(),
            access_key: None,
            secret_key: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WAYBACK_`
    /// 2. TOML file from `WAYBACK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WAYBACK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WAYBACK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Archive credentials for capture requests (deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if either key is unset or empty.
    pub fn require_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let access = self.access_key.as_deref().filter(|k| !k.is_empty());
        let secret = self.secret_key.as_deref().filter(|k| !k.is_empty());

        match (access, secret) {
            (Some(access), Some(secret)) => Ok((access, secret)),
            (None, _) => Err(ConfigError::Missing {
                field: "access_key".into(),
                hint: "Set WAYBACK_ACCESS_KEY environment variable".into(),
            }),
            (_, None) => Err(ConfigError::Missing {
                field: "secret_key".into(),
                hint: "Set WAYBACK_SECRET_KEY environment variable".into(),
            }),
        }
    }
}
