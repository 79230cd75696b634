//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default remote collection endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// Category assigned to every quote pulled from the remote endpoint.
pub const SERVER_CATEGORY: &str = "Server";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the durable key-value store.
    pub data_dir: PathBuf,
    /// Remote collection endpoint (read and write).
    pub endpoint: String,
    /// Whether the periodic reconciler runs.
    pub sync_enabled: bool,
    /// Period of the reconciler ticker.
    pub sync_interval: Duration,
    /// Maximum number of remote items taken per sync.
    pub fetch_limit: usize,
    /// Category label for remote items.
    pub server_category: String,
    /// How long a notice stays visible.
    pub notice_ttl: Duration,
    /// Default directory for `quotes.json` exports.
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            data_dir: PathBuf::from(home).join(".quotebook"),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sync_enabled: true,
            sync_interval: Duration::from_secs(30),
            fetch_limit: 5,
            server_category: SERVER_CATEGORY.to_string(),
            notice_ttl: Duration::from_secs(3),
            export_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Build the configuration from `QUOTEBOOK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("QUOTEBOOK_DATA_DIR").filter(|s| !s.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(endpoint) = lookup("QUOTEBOOK_ENDPOINT") {
            let endpoint = endpoint.trim();
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: "QUOTEBOOK_ENDPOINT".into(),
                    message: format!("expected an http(s) URL, got {endpoint:?}"),
                });
            }
            config.endpoint = endpoint.to_string();
        }

        if let Some(secs) = lookup("QUOTEBOOK_SYNC_INTERVAL_SECS") {
            let secs = parse_positive("QUOTEBOOK_SYNC_INTERVAL_SECS", &secs)?;
            config.sync_interval = Duration::from_secs(secs as u64);
        }

        if let Some(limit) = lookup("QUOTEBOOK_FETCH_LIMIT") {
            config.fetch_limit = parse_positive("QUOTEBOOK_FETCH_LIMIT", &limit)?;
        }

        if let Some(flag) = lookup("QUOTEBOOK_SYNC") {
            config.sync_enabled = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "off" | "0" | "false" | "no"
            );
        }

        if let Some(dir) = lookup("QUOTEBOOK_EXPORT_DIR").filter(|s| !s.trim().is_empty()) {
            config.export_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be greater than zero".into(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}
