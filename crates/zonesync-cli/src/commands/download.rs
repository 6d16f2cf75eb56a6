//! Download command - Fetch a remote folder into a local directory

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{build_synchronizer, load_config, FilterArgs};
use crate::output::{get_formatter, OutputFormat};

/// Download the files of a remote directory
#[derive(Debug, Args)]
pub struct DownloadCommand {
    /// Remote source directory ("/" for the zone root)
    pub remote: String,

    /// Local destination directory
    #[arg(default_value = ".")]
    pub local: PathBuf,

    #[command(flatten)]
    pub filters: FilterArgs,
}

impl DownloadCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = load_config(config_path)?;
        let options = self.filters.to_options()?;
        let synchronizer = build_synchronizer(&config)?;

        info!(remote = %self.remote, local = %self.local.display(), "Starting download");
        match synchronizer
            .download_folder(&self.remote, &self.local, &options)
            .await
        {
            Ok(report) => {
                formatter.report("Downloaded", &report);
                Ok(())
            }
            Err(e) => {
                formatter.error(&e.to_string());
                anyhow::bail!("download of '{}' failed", self.remote)
            }
        }
    }
}
