//! ZoneSync CLI - Command-line interface for ZoneSync
//!
//! Provides commands for:
//! - Uploading a local folder into a storage zone
//! - Downloading a remote folder
//! - Listing and deleting remote objects
//! - Viewing and managing configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zonesync_core::config::Config;

mod commands;
mod output;

use commands::{
    config::ConfigCommand, download::DownloadCommand, ls::LsCommand, rm::RmCommand,
    upload::UploadCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "zonesync", version, about = "Sync folders with a storage zone")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a local folder into the zone
    Upload(UploadCommand),
    /// Download a remote folder
    Download(DownloadCommand),
    /// List a remote directory
    Ls(LsCommand),
    /// Delete a remote file
    Rm(RmCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Filter directive used when `RUST_LOG` is not set.
    fn log_directive(&self, config: &Config) -> &'static str {
        if self.quiet {
            return "off";
        }
        match self.verbose {
            0 => config.logging.level.as_filter(),
            1 => "debug",
            _ => "trace",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config_path();

    // Setup tracing
    let file_config = Config::load_or_default(&config_path);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive(&file_config)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match &cli.command {
        Commands::Upload(cmd) => cmd.execute(&config_path, format).await,
        Commands::Download(cmd) => cmd.execute(&config_path, format).await,
        Commands::Ls(cmd) => cmd.execute(&config_path, format).await,
        Commands::Rm(cmd) => cmd.execute(&config_path, format).await,
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
    }
}
