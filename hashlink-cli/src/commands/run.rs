use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::mpsc;

use hashlink_archive::{ArchiveResolver, HttpProbe, Taxonomy};
use hashlink_core::GameId;
use hashlink_pipeline::async_util::drive_with_events;
use hashlink_pipeline::{BatchRunner, PersistOptions, Settings, apply_batch, summary_text};
use hashlink_ra::{RaClient, load_api_key};
use hashlink_store::with_thousands;

use crate::cli_types::DocumentArgs;
use crate::error::CliError;
use crate::marks::ok_mark;
use crate::progress::RunProgress;

pub(crate) struct RunArgs {
    pub ids: Option<Vec<GameId>>,
    pub dry_run: bool,
    pub docs: DocumentArgs,
    pub readme: Option<PathBuf>,
}

/// Resolve the selected games and merge the results into the documents.
///
/// The summary is the only thing written to stdout.
pub(crate) async fn run_batch(
    settings: &Settings,
    args: RunArgs,
    quiet: bool,
) -> Result<(), CliError> {
    // Checked before anything touches the network.
    let api_key = load_api_key(settings.api_key.as_deref())?;

    let taxonomy = Taxonomy::load_or_builtin(settings.archive.taxonomy_path.as_deref())?;
    let client = RaClient::new(
        settings.upstream.base_url.clone(),
        api_key,
        settings.upstream.request_timeout(),
    )?;
    let http = HttpProbe::new(settings.archive.probe_timeout())
        .map_err(|e| CliError::runtime(format!("Failed to build HTTP client: {e}")))?;
    let resolver = ArchiveResolver::new(taxonomy, settings.archive.layout(), http);

    let ids = match args.ids {
        Some(ids) => ids,
        None => {
            log::info!(
                "Reading claim feeds (last {} days)...",
                settings.upstream.activity_window_days
            );
            client
                .recent_game_ids(settings.upstream.activity_window(), Utc::now())
                .await
        }
    };
    if ids.is_empty() {
        log::info!("No recently claimed games");
    } else {
        log::info!("Processing {} games", ids.len());
    }

    let runner = BatchRunner::new(&client, &resolver, settings.batch_options());
    let mut progress = RunProgress::new(ids.len(), quiet);
    let (tx, rx) = mpsc::unbounded_channel();
    let batch = drive_with_events(runner.run(&ids, tx), rx, |event| progress.handle(event)).await;
    progress.finish();

    let persist = PersistOptions {
        links_path: args
            .docs
            .links
            .unwrap_or_else(|| settings.links_path.clone()),
        missing_path: args
            .docs
            .missing
            .unwrap_or_else(|| settings.missing_path.clone()),
        readme_path: args.readme.or_else(|| settings.readme_path.clone()),
        dry_run: args.dry_run,
    };
    let summary = apply_batch(&batch, &persist, Utc::now())?;

    log::info!(
        "{} {} games processed, {} skipped",
        ok_mark(),
        batch.games_processed,
        batch.games_skipped,
    );
    log::info!(
        "  Linked: {} new, {} already present ({} total)",
        summary.stats.added,
        summary.stats.existing,
        with_thousands(summary.linked_total),
    );
    if !args.dry_run {
        log::info!(
            "  Missing: {} new, {} now linked ({} total)",
            summary.missing_added,
            summary.reconciled,
            with_thousands(summary.missing_total),
        );
    }

    if let Some(text) = summary_text(&summary.stats) {
        print!("{text}");
    }
    Ok(())
}
