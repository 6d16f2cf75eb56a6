//! CLI subcommands and the wiring they share

pub mod config;
pub mod download;
pub mod ls;
pub mod rm;
pub mod upload;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use zonesync_core::config::Config;
use zonesync_storage::StorageClient;
use zonesync_sync::{LocalFileSystemAdapter, SyncOptions, TreeSynchronizer};

/// File selection flags shared by `upload` and `download`
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Include sub-directories
    #[arg(short, long)]
    pub recursive: bool,

    /// Skip files with this extension (repeatable, e.g. --exclude .md)
    #[arg(long, value_name = "EXT")]
    pub exclude: Vec<String>,

    /// Only transfer files whose relative path matches this glob
    #[arg(long, value_name = "PATTERN")]
    pub include_glob: Option<String>,
}

impl FilterArgs {
    /// Builds engine options from the flags.
    pub fn to_options(&self) -> Result<SyncOptions> {
        let mut options = SyncOptions::new().recursive(self.recursive);
        options.excluded_file_types = self.exclude.clone();

        if let Some(pattern) = &self.include_glob {
            let pattern = glob::Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern '{pattern}'"))?;
            options = options.filter(move |path: &str| pattern.matches(path));
        }
        Ok(options)
    }
}

/// Loads the configuration at `path`, applies environment overrides and
/// validates it.
///
/// A missing file is treated as an empty configuration so that everything
/// can come from the environment.
pub(crate) fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?
    } else {
        Config::default()
    };
    let config = config.with_env_overrides();

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("Invalid configuration: {}", messages.join("; "));
    }

    info!(config_path = %path.display(), zone = %config.storage.zone_name, "Loaded configuration");
    Ok(config)
}

/// Wires the HTTP client and local filesystem into a synchronizer.
pub(crate) fn build_synchronizer(config: &Config) -> Result<TreeSynchronizer> {
    let paths = config
        .storage
        .remote_paths()
        .context("Invalid storage endpoint")?;
    let client = StorageClient::new(&config.storage.access_key)
        .context("Failed to create storage client")?;

    Ok(TreeSynchronizer::new(
        Arc::new(client),
        Arc::new(LocalFileSystemAdapter::new()),
        paths,
        &config.transfer,
    ))
}
