//! Configuration management for the BGG tools.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with defaults matching the public BoardGameGeek endpoints.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// BoardGameGeek client settings
    #[serde(default)]
    pub bgg: BggConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// BoardGameGeek client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BggConfig {
    /// XML API v2 root (search, thing)
    pub xml_api_url: String,

    /// geekdo JSON API root for linked items
    pub geekitem_api_url: String,

    /// Publisher directory listing on the website
    pub publisher_directory_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Proactive request pacing; 0 disables it
    pub requests_per_second: f64,

    /// How many directory pages to scan when resolving a publisher
    pub publisher_directory_pages: u32,

    /// Retry settings shared by all rate-limited calls
    pub retry: RetryConfig,

    /// Paging of a designer's catalog
    #[serde(deserialize_with = "designer_catalog")]
    pub designer_catalog: CatalogConfig,

    /// Paging of a publisher's catalog
    #[serde(deserialize_with = "publisher_catalog")]
    pub publisher_catalog: CatalogConfig,
}

/// Rate-limit retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Delay after a 429 on single-item lookups, in milliseconds
    pub lookup_delay_ms: u64,

    /// Multiplier applied to the delay after each consecutive 429
    pub backoff_multiplier: f64,

    /// Upper bound for a single delay, in milliseconds
    pub max_delay_ms: u64,

    /// Maximum consecutive 429 retries (None = retry forever)
    pub max_retries: Option<u32>,
}

/// Paging configuration for one linked-items query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Items per page (`showcount`)
    pub page_size: u32,

    /// Server-side sort order
    pub sort: String,

    /// Delay after a 429 while paging, in milliseconds
    pub retry_delay_ms: u64,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file was missing
    Defaults,
}

/// A `[bgg.*_catalog]` table as written; absent keys keep the per-kind default
#[derive(Debug, Default, Deserialize)]
struct CatalogOverrides {
    page_size: Option<u32>,
    sort: Option<String>,
    retry_delay_ms: Option<u64>,
}

impl CatalogOverrides {
    fn apply(self, base: CatalogConfig) -> CatalogConfig {
        CatalogConfig {
            page_size: self.page_size.unwrap_or(base.page_size),
            sort: self.sort.unwrap_or(base.sort),
            retry_delay_ms: self.retry_delay_ms.unwrap_or(base.retry_delay_ms),
        }
    }
}

fn designer_catalog<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CatalogConfig, D::Error> {
    Ok(CatalogOverrides::deserialize(deserializer)?.apply(CatalogConfig::designer()))
}

fn publisher_catalog<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CatalogConfig, D::Error> {
    Ok(CatalogOverrides::deserialize(deserializer)?.apply(CatalogConfig::publisher()))
}

impl CatalogConfig {
    /// Defaults for a designer's catalog
    pub fn designer() -> Self {
        Self {
            page_size: 50,
            sort: "name".to_string(),
            retry_delay_ms: 30_000,
        }
    }

    /// Defaults for a publisher's catalog
    pub fn publisher() -> Self {
        Self {
            page_size: 1000,
            sort: "name".to_string(),
            retry_delay_ms: 10_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl Default for BggConfig {
    fn default() -> Self {
        Self {
            xml_api_url: "https://www.boardgamegeek.com/xmlapi2".to_string(),
            geekitem_api_url: "https://api.geekdo.com/api/geekitem".to_string(),
            publisher_directory_url: "https://boardgamegeek.com/browse/boardgamepublisher"
                .to_string(),
            user_agent: "bgg-tools/0.1.0".to_string(),
            timeout_secs: 30,
            requests_per_second: 0.0,
            publisher_directory_pages: 1,
            retry: RetryConfig::default(),
            designer_catalog: CatalogConfig::designer(),
            publisher_catalog: CatalogConfig::publisher(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            lookup_delay_ms: 1_000,
            backoff_multiplier: 1.0,
            max_delay_ms: 300_000,
            max_retries: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields the defaults and `ConfigSource::Defaults`.
    /// Nothing is logged, so this is safe to call before logging is set up.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, ConfigSource)> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok((config, ConfigSource::File))
    }

    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (config, source) = Self::load(path)?;

        match source {
            ConfigSource::File => tracing::info!(
                path = %path.display(),
                "Configuration loaded successfully"
            ),
            ConfigSource::Defaults => tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            ),
        }

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }
}
