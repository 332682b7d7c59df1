//! Configuration file parser for the podshelf source list.
//!
//! Unlike most optional app config, the source list is the whole point
//! of a run: a missing config file or an empty `sources` table is a
//! fatal error, reported before any ingestion starts. Unknown keys are
//! ignored by serde but logged as a warning to catch typos.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::model::SourceConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    Missing(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Config declares no sources — add at least one [[sources]] entry")]
    NoSources,

    #[error("Source '{name}' has invalid URL '{url}': {reason}")]
    InvalidSourceUrl {
        name: String,
        url: String,
        reason: String,
    },
}

/// Top-level application configuration.
///
/// `sources` is required and must be non-empty; the remaining keys use
/// `#[serde(default)]` and may be omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Podcast sources, processed in file order.
    pub sources: Vec<SourceConfig>,

    /// Directory for the date-stamped batch log file. Created at
    /// startup if missing.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Per-fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_fetch_timeout_secs() -> u64 {
    crate::feed::DEFAULT_FETCH_TIMEOUT.as_secs()
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load and validate configuration from a TOML file.
    ///
    /// - Missing file → `Err(ConfigError::Missing)` — fatal, there is
    ///   nothing to ingest without a source list
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Empty `sources` → `Err(ConfigError::NoSources)`
    /// - Any source URL that is not parseable http(s) →
    ///   `Err(ConfigError::InvalidSourceUrl)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading to prevent memory
        // exhaustion from a corrupted config file.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;

        // Parse as a raw table first to flag probable typos.
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["sources", "log_dir", "fetch_timeout_secs"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            sources = config.sources.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Rejects empty source lists and malformed source URLs, so the
    /// pipeline downstream can assume well-formed input.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        for source in &self.sources {
            match Url::parse(&source.url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => {
                    return Err(ConfigError::InvalidSourceUrl {
                        name: source.name.clone(),
                        url: source.url.clone(),
                        reason: format!("unsupported scheme '{}'", url.scheme()),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::InvalidSourceUrl {
                        name: source.name.clone(),
                        url: source.url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }
}
