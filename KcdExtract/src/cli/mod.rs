//! KcdExtract CLI - Command-line interface for KCD2 item extraction

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;
use std::path::PathBuf;
use tracing::Level;

use crate::config::ExtractConfig;

#[derive(Parser)]
#[command(name = "kcdextract")]
#[command(about = "KcdExtract: item table extraction for Kingdom Come: Deliverance II", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/kcdextract/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overriding the config file
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Game install folder, overriding the config file
    #[arg(long, global = true)]
    game_path: Option<String>,

    /// Log per-field details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<ExtractConfig> {
        let mut config = ExtractConfig::load(self.config.as_deref())?;
        if let Some(data_dir) = &self.data_dir {
            config.data_dir.clone_from(data_dir);
        }
        if let Some(game_path) = &self.game_path {
            config.game_path = Some(game_path.clone());
        }
        Ok(config)
    }
}

/// Run the KcdExtract CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = cli.load_config()?;
    cli.command.execute(&config)?;

    Ok(())
}
