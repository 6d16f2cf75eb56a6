//! Ls command - List a remote directory

use std::path::Path;

use anyhow::Result;
use clap::Args;

use super::{build_synchronizer, load_config};
use crate::output::{get_formatter, OutputFormat};

/// List the entries of a remote directory
#[derive(Debug, Args)]
pub struct LsCommand {
    /// Remote directory ("/" for the zone root)
    #[arg(default_value = "/")]
    pub remote: String,

    /// List every file below the directory
    #[arg(short, long)]
    pub recursive: bool,
}

impl LsCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = load_config(config_path)?;
        let synchronizer = build_synchronizer(&config)?;

        match synchronizer.lister().list(&self.remote, self.recursive).await {
            Ok(entries) => {
                formatter.entries(&entries, synchronizer.executor().paths());
                Ok(())
            }
            Err(e) => {
                formatter.error(&e.to_string());
                anyhow::bail!("listing of '{}' failed", self.remote)
            }
        }
    }
}
