//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use hashlink_core::GameId;

#[derive(Parser)]
#[command(name = "hashlink")]
#[command(about = "Link RetroAchievements hashes to archive download URLs", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to ~/.config/hashlink/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only show warnings and errors (suppress progress and normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Document locations, overriding the settings file.
#[derive(Args, Clone, Default)]
pub(crate) struct DocumentArgs {
    /// Resolved-links document
    #[arg(long)]
    pub links: Option<PathBuf>,

    /// Missing-hashes document
    #[arg(long)]
    pub missing: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Resolve recently claimed games and merge the results
    Run {
        /// Game ids to process instead of reading the claim feeds (e.g., 1,2,3)
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<GameId>>,

        /// Resolve and print the summary without writing the documents
        #[arg(short = 'n', long)]
        dry_run: bool,

        #[command(flatten)]
        docs: DocumentArgs,

        /// README whose status block is refreshed after the run
        #[arg(long)]
        readme: Option<PathBuf>,
    },

    /// Print the candidate URLs for one file name
    Plan {
        /// Console name as reported upstream (e.g., "PlayStation")
        #[arg(long)]
        console: String,

        /// Labels of the file (e.g., redump or nointro,rapatches)
        #[arg(long, value_delimiter = ',', required = true)]
        labels: Vec<String>,

        /// Declared file name
        file_name: String,

        /// Probe the candidates and print the first one the archive serves
        #[arg(long)]
        probe: bool,
    },

    /// Count the hash entries in both documents
    Count {
        #[command(flatten)]
        docs: DocumentArgs,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings and where the API key comes from
    Show,

    /// Print the settings file path
    Path,
}
