//! Upload command - Push a local folder into the storage zone

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{build_synchronizer, load_config, FilterArgs};
use crate::output::{get_formatter, OutputFormat};

/// Upload the files of a local directory
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Local source directory
    pub local: PathBuf,

    /// Remote destination directory ("/" for the zone root)
    #[arg(default_value = "/")]
    pub remote: String,

    #[command(flatten)]
    pub filters: FilterArgs,
}

impl UploadCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = load_config(config_path)?;
        let options = self.filters.to_options()?;
        let synchronizer = build_synchronizer(&config)?;

        info!(local = %self.local.display(), remote = %self.remote, "Starting upload");
        match synchronizer
            .upload_folder(&self.local, &self.remote, &options)
            .await
        {
            Ok(report) => {
                formatter.report("Uploaded", &report);
                Ok(())
            }
            Err(e) => {
                formatter.error(&e.to_string());
                anyhow::bail!("upload of {} failed", self.local.display())
            }
        }
    }
}
