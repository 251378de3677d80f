use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use hashlink_pipeline::Settings;
use hashlink_store::{count_file, with_thousands};

use crate::cli_types::DocumentArgs;
use crate::error::CliError;

/// Print the number of hash entries in each document.
pub(crate) fn run_count(settings: &Settings, docs: &DocumentArgs) -> Result<(), CliError> {
    let links = docs.links.as_deref().unwrap_or(&settings.links_path);
    let missing = docs.missing.as_deref().unwrap_or(&settings.missing_path);

    print_count("Linked hashes", links)?;
    print_count("Missing hashes", missing)?;
    Ok(())
}

fn print_count(label: &str, path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        log::warn!("{} does not exist", path.display());
        return Ok(());
    }
    let count = count_file(path)?;
    println!(
        "{label}: {} {}",
        with_thousands(count).if_supports_color(Stdout, |t| t.bold()),
        format!("({})", path.display()).if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}
