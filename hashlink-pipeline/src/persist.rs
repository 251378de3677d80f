//! Folding a batch into the documents on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hashlink_store::{
    MergeStats, StoreError, count_new, load_links, load_missing, merge_links, merge_missing,
    reconcile, save_links, save_missing, update_readme,
};

use crate::batch::BatchResult;

#[derive(Debug, Clone)]
pub struct PersistOptions {
    pub links_path: PathBuf,
    pub missing_path: PathBuf,
    /// README whose status block is refreshed after saving
    pub readme_path: Option<PathBuf>,
    /// Compute the counts without writing anything
    pub dry_run: bool,
}

/// What a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: MergeStats,
    pub missing_added: usize,
    pub reconciled: usize,
    pub linked_total: usize,
    pub missing_total: usize,
}

/// Merge `batch` into both documents, reconcile, save and refresh the README.
///
/// Resolved and missing hashes are merged before reconciliation, so a hash
/// found in this run is removed from the missing document even if an
/// earlier run recorded it there.
pub fn apply_batch(
    batch: &BatchResult,
    options: &PersistOptions,
    now: DateTime<Utc>,
) -> Result<RunSummary, StoreError> {
    let mut links = load_links(&options.links_path)?;
    let mut missing = load_missing(&options.missing_path)?;

    if options.dry_run {
        let stats = count_new(&links, &batch.links);
        log::info!("Dry run: documents left untouched");
        return Ok(RunSummary {
            stats,
            linked_total: links.hash_count() + stats.added,
            missing_total: missing.hash_count(),
            ..RunSummary::default()
        });
    }

    let stats = merge_links(&mut links, &batch.links);
    let missing_added = merge_missing(&mut missing, &batch.missing);
    let reconciled = reconcile(&mut missing, &links);

    save_links(&options.links_path, &links)?;
    save_missing(&options.missing_path, &missing)?;

    let summary = RunSummary {
        stats,
        missing_added,
        reconciled,
        linked_total: links.hash_count(),
        missing_total: missing.hash_count(),
    };

    if let Some(readme) = options.readme_path.as_deref() {
        refresh_readme(readme, &summary, now);
    }
    Ok(summary)
}

/// README problems are reported but never fail a run.
fn refresh_readme(path: &Path, summary: &RunSummary, now: DateTime<Utc>) {
    match update_readme(path, summary.linked_total, summary.missing_total, now) {
        Ok(()) => {}
        Err(StoreError::ReadmeMarkerMissing(path)) => {
            log::warn!("Failed to update {path}: status block not found");
        }
        Err(e) => log::error!("Error updating README: {e}"),
    }
}
