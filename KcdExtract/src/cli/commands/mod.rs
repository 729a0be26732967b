use clap::Subcommand;
use std::path::PathBuf;

use crate::config::ExtractConfig;

pub mod build;
pub mod extract;
pub mod merge;
pub mod version;

#[derive(Subcommand)]
pub enum Commands {
    /// Build data.json for the current game version
    Build {
        /// Collect tables from the game archives first
        #[arg(short, long)]
        extract: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Collect item tables and localized names from the game archives
    Extract {
        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write the merged item tables as a single XML file
    Merge {
        /// Output directory (defaults to the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a pruned copy without non-gameplay items and attributes
        #[arg(long)]
        purge: bool,
    },

    /// Print the game version the data directory describes
    Version {
        /// Refresh version.json from the game install first
        #[arg(long)]
        sync: bool,
    },
}

impl Commands {
    pub fn execute(&self, config: &ExtractConfig) -> anyhow::Result<()> {
        match self {
            Commands::Build { extract, quiet } => build::execute(config, *extract, !*quiet),
            Commands::Extract { quiet } => extract::execute(config, !*quiet).map(|_| ()),
            Commands::Merge { output, purge } => merge::execute(config, output.as_deref(), *purge),
            Commands::Version { sync } => version::execute(config, *sync),
        }
    }
}
