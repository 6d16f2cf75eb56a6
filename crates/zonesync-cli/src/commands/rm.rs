//! Rm command - Delete one remote file

use std::path::Path;

use anyhow::Result;
use clap::Args;

use super::{build_synchronizer, load_config};
use crate::output::{get_formatter, OutputFormat};

/// Delete a file from the storage zone
#[derive(Debug, Args)]
pub struct RmCommand {
    /// Remote directory holding the file ("/" for the zone root)
    pub directory: String,

    /// Name of the file to delete
    pub file: String,
}

impl RmCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let config = load_config(config_path)?;
        let synchronizer = build_synchronizer(&config)?;

        match synchronizer
            .executor()
            .delete(&self.directory, &self.file)
            .await
        {
            Ok(url) => {
                if matches!(format, OutputFormat::Json) {
                    formatter.print_json(&serde_json::json!({
                        "success": true,
                        "deleted": url,
                    }));
                } else {
                    formatter.success(&format!("Deleted {url}"));
                }
                Ok(())
            }
            Err(e) => {
                formatter.error(&e.to_string());
                anyhow::bail!("delete of '{}' failed", self.file)
            }
        }
    }
}
