//! Config command - View and manage ZoneSync configuration
//!
//! Provides the `zonesync config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON), access key redacted
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors
//! 4. Prints the configuration file path

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;
use zonesync_core::config::{BackoffStrategy, Config, LogLevel};

use crate::output::{get_formatter, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "transfer.concurrency")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(config_path, format),
            ConfigCommand::Set { key, value } => {
                self.execute_set(config_path, key, value, format)
            }
            ConfigCommand::Validate => self.execute_validate(config_path, format),
            ConfigCommand::Path => {
                let formatter = get_formatter(matches!(format, OutputFormat::Json));
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::json!({
                        "config_path": config_path.display().to_string(),
                        "exists": config_path.exists(),
                    }));
                } else {
                    println!("{}", config_path.display());
                }
                Ok(())
            }
        }
    }

    fn execute_show(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let config = redacted(Config::load_or_default(config_path).with_env_overrides());

        info!(config_path = %config_path.display(), "Showing configuration");

        if matches!(format, OutputFormat::Json) {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
            formatter.info("");
            formatter.info(&format!("endpoint: {}", config.storage.endpoint()));
        }

        Ok(())
    }

    fn execute_set(
        &self,
        config_path: &Path,
        key: &str,
        value: &str,
        format: OutputFormat,
    ) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));
        let mut config = Config::load_or_default(config_path);

        info!(key = %key, "Setting configuration value");

        if let Err(e) = apply_config_value(&mut config, key, value) {
            if matches!(format, OutputFormat::Json) {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "error": e.to_string(),
                }));
            } else {
                formatter.error(&format!("Failed to set '{}': {}", key, e));
                formatter.info("");
                formatter.info("Supported keys:");
                for (name, help) in SUPPORTED_KEYS {
                    formatter.info(&format!("  {name:<26} - {help}"));
                }
            }
            return Ok(());
        }

        // Only reject errors in the field being set; the file may be built
        // up one key at a time.
        let errors: Vec<String> = config
            .validate()
            .into_iter()
            .filter(|e| e.field == key)
            .map(|e| e.to_string())
            .collect();
        if !errors.is_empty() {
            if matches!(format, OutputFormat::Json) {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "errors": errors,
                }));
            } else {
                formatter.error(&format!("Invalid value for '{}': {}", key, errors.join("; ")));
            }
            return Ok(());
        }

        config
            .save(config_path)
            .context("Failed to write configuration file")?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "config_path": config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Set {}", key));
            formatter.info(&format!("Saved to {}", config_path.display()));
        }
        Ok(())
    }

    fn execute_validate(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = match Config::load(config_path) {
            Ok(cfg) => cfg.with_env_overrides(),
            Err(e) => {
                let message = if config_path.exists() {
                    format!("Failed to parse configuration: {}", e)
                } else {
                    "Configuration file not found".to_string()
                };
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [message],
                    }));
                } else {
                    formatter.error(&message);
                    formatter.info(&format!("File: {}", config_path.display()));
                }
                return Ok(());
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");
        let errors = config.validate();

        if matches!(format, OutputFormat::Json) {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        Ok(())
    }
}

const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("storage.zone_name", "Storage zone name"),
    ("storage.access_key", "AccessKey header value"),
    ("storage.region", "Region code (ny, la, sg, ...); empty for primary"),
    ("storage.base_url", "Explicit endpoint URL; empty to derive from region"),
    ("transfer.concurrency", "Maximum simultaneous requests"),
    ("transfer.retry_count", "Retries after a failed request"),
    ("transfer.retry_delay_ms", "Base delay between retries (ms)"),
    ("transfer.backoff", "linear|immediate"),
    ("logging.level", "verbose|error|silent"),
];

fn redacted(mut config: Config) -> Config {
    if !config.storage.access_key.is_empty() {
        config.storage.access_key = "<redacted>".into();
    }
    config
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        // --- storage ---
        "storage.zone_name" => {
            config.storage.zone_name = value.to_string();
        }
        "storage.access_key" => {
            config.storage.access_key = value.to_string();
        }
        "storage.region" => {
            config.storage.region = optional(value);
        }
        "storage.base_url" => {
            config.storage.base_url = optional(value);
        }

        // --- transfer ---
        "transfer.concurrency" => {
            config.transfer.concurrency = value
                .parse::<usize>()
                .context("Expected a positive integer for transfer.concurrency")?;
        }
        "transfer.retry_count" => {
            config.transfer.retry_count = value
                .parse::<u32>()
                .context("Expected a non-negative integer")?;
        }
        "transfer.retry_delay_ms" => {
            config.transfer.retry_delay_ms = value
                .parse::<u64>()
                .context("Expected a non-negative integer")?;
        }
        "transfer.backoff" => {
            config.transfer.backoff = match value.to_ascii_lowercase().as_str() {
                "linear" => BackoffStrategy::Linear,
                "immediate" => BackoffStrategy::Immediate,
                other => anyhow::bail!("Unknown backoff strategy '{}'", other),
            };
        }

        // --- logging ---
        "logging.level" => {
            config.logging.level = match value.to_ascii_lowercase().as_str() {
                "verbose" => LogLevel::Verbose,
                "error" => LogLevel::Error,
                "silent" => LogLevel::Silent,
                other => anyhow::bail!("Unknown log level '{}'", other),
            };
        }

        _ => {
            anyhow::bail!("Unknown configuration key: '{}'", key);
        }
    }

    Ok(())
}
