//! hashlink CLI
//!
//! Maps RetroAchievements game hashes to download URLs on a public ROM archive.

mod cli_types;
mod commands;
mod error;
mod marks;
mod progress;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use hashlink_pipeline::Settings;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

/// Install the stderr logger. `RUST_LOG` overrides the flag-derived level.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .target(env_logger::Target::Stderr);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{level}: {}", record.args()),
        });
    }
    builder.parse_env("RUST_LOG");
    builder.init();
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    if let Commands::Config {
        action: ConfigAction::Path,
    } = cli.command
    {
        let path = cli.config.unwrap_or_else(hashlink_pipeline::settings_path);
        println!("{}", path.display());
        return Ok(());
    }

    let (settings, settings_path) = Settings::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            ids,
            dry_run,
            docs,
            readme,
        } => {
            let args = commands::run::RunArgs {
                ids,
                dry_run,
                docs,
                readme,
            };
            commands::run::run_batch(&settings, args, cli.quiet).await
        }
        Commands::Plan {
            console,
            labels,
            file_name,
            probe,
        } => commands::plan::run_plan(&settings, &console, &labels, &file_name, probe).await,
        Commands::Count { docs } => commands::count::run_count(&settings, &docs),
        Commands::Config { .. } => {
            commands::config::run_config_show(&settings, &settings_path);
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{} {e}", marks::fail_mark());
            ExitCode::FAILURE
        }
    }
}
