//! Configuration module for ZoneSync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::paths::RemotePaths;

/// Environment variable that overrides `storage.access_key`.
pub const ACCESS_KEY_ENV: &str = "ZONESYNC_ACCESS_KEY";

/// Primary storage endpoint, used when no region is configured.
pub const DEFAULT_ENDPOINT: &str = "https://storage.bunnycdn.com/";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for ZoneSync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub transfer: TransferConfig,
    pub logging: LoggingConfig,
}

/// Storage zone and credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Name of the storage zone (the first path segment of every object URL).
    pub zone_name: String,
    /// `AccessKey` header value. Usually supplied through `ZONESYNC_ACCESS_KEY`.
    pub access_key: String,
    /// Storage region code (`ny`, `la`, `sg`, ...). Empty or `de` selects the
    /// primary endpoint.
    pub region: Option<String>,
    /// Explicit endpoint URL; takes precedence over `region`.
    pub base_url: Option<String>,
}

/// How the delay grows between retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// The Nth retry waits `N * retry_delay_ms`.
    #[default]
    Linear,
    /// Retries are issued immediately.
    Immediate,
}

/// Transfer concurrency and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Maximum number of simultaneous transfers and listing requests.
    pub concurrency: usize,
    /// Additional attempts after the first failure of a transport call.
    pub retry_count: u32,
    /// Base delay between retries (in milliseconds).
    pub retry_delay_ms: u64,
    /// Backoff strategy applied to `retry_delay_ms`.
    pub backoff: BackoffStrategy,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every operation is logged.
    Verbose,
    /// Only failures are logged.
    #[default]
    Error,
    /// Nothing is logged.
    Silent,
}

impl LogLevel {
    /// Equivalent `tracing` filter directive.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Verbose => "debug",
            LogLevel::Error => "error",
            LogLevel::Silent => "off",
        }
    }
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log verbosity: `verbose`, `error`, or `silent`.
    pub level: LogLevel,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Write the configuration as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/zonesync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("zonesync")
            .join("config.yaml")
    }

    /// Applies environment overrides (currently `ZONESYNC_ACCESS_KEY`).
    pub fn with_env_overrides(self) -> Self {
        self.with_access_key_override(std::env::var(ACCESS_KEY_ENV).ok())
    }

    /// Replaces the access key when `value` is a non-empty string.
    pub fn with_access_key_override(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.filter(|k| !k.is_empty()) {
            self.storage.access_key = key;
        }
        self
    }
}

impl StorageConfig {
    /// Endpoint URL derived from `base_url` or `region`.
    pub fn endpoint(&self) -> String {
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.is_empty()) {
            return url.to_string();
        }

        match self.region.as_deref().map(str::trim) {
            None | Some("") | Some("de") => DEFAULT_ENDPOINT.to_string(),
            Some(region) => format!("https://{}.storage.bunnycdn.com/", region.to_lowercase()),
        }
    }

    /// Path/URL mapper for this zone.
    pub fn remote_paths(&self) -> Result<RemotePaths, DomainError> {
        RemotePaths::new(&self.endpoint(), &self.zone_name)
    }
}

impl TransferConfig {
    /// Base retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            retry_count: 3,
            retry_delay_ms: 500,
            backoff: BackoffStrategy::Linear,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"transfer.concurrency"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- storage ---
        if self.storage.zone_name.trim().is_empty() {
            errors.push(ValidationError {
                field: "storage.zone_name".into(),
                message: "must not be empty".into(),
            });
        } else if self.storage.zone_name.contains('/') {
            errors.push(ValidationError {
                field: "storage.zone_name".into(),
                message: "must not contain '/'".into(),
            });
        }
        if self.storage.access_key.is_empty() {
            errors.push(ValidationError {
                field: "storage.access_key".into(),
                message: format!("must be set (or provide {ACCESS_KEY_ENV})"),
            });
        }
        if let Some(url) = self.storage.base_url.as_deref().filter(|u| !u.is_empty()) {
            let valid = url::Url::parse(url)
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                errors.push(ValidationError {
                    field: "storage.base_url".into(),
                    message: format!("'{url}' is not an absolute http(s) URL"),
                });
            }
        }

        // --- transfer ---
        if self.transfer.concurrency == 0 {
            errors.push(ValidationError {
                field: "transfer.concurrency".into(),
                message: "must be greater than 0".into(),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Config`].
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- storage ---

    pub fn zone_name(mut self, zone: impl Into<String>) -> Self {
        self.config.storage.zone_name = zone.into();
        self
    }

    pub fn access_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage.access_key = key.into();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.storage.region = Some(region.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.storage.base_url = Some(url.into());
        self
    }

    // --- transfer ---

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.transfer.concurrency = n;
        self
    }

    pub fn retry_count(mut self, n: u32) -> Self {
        self.config.transfer.retry_count = n;
        self
    }

    pub fn retry_delay_ms(mut self, ms: u64) -> Self {
        self.config.transfer.retry_delay_ms = ms;
        self
    }

    pub fn backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.config.transfer.backoff = backoff;
        self
    }

    // --- logging ---

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
