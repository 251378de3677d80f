//! Turning a list of game ids into resolved links and missing hashes.
//!
//! Games run strictly one after another with a pause after each metadata
//! fetch. The files of one game are resolved concurrently; each returns its
//! own outcome and the outcomes are folded once all of them have settled.

use std::collections::HashSet;
use std::time::Duration;

use futures::future::join_all;
use hashlink_archive::{ArchiveResolver, Probe};
use hashlink_core::{
    ExclusionRules, GameId, GameRecord, HashEntry, HashLinks, MissingHashes, classify_labels,
    exclusion,
};
use hashlink_ra::GameSource;
use indexmap::IndexMap;
use tokio::sync::mpsc;

/// Events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// A game is about to be fetched.
    GameStarted { index: usize, total: usize, id: GameId },
    /// A game was not processed.
    GameSkipped { id: GameId, reason: String },
    /// Metadata arrived; files are about to be resolved.
    GameFetched {
        id: GameId,
        console: String,
        entries: usize,
    },
    /// All files of a game have an outcome.
    GameFinished {
        id: GameId,
        resolved: usize,
        missing: usize,
        excluded: usize,
    },
    /// The batch is complete.
    Done { resolved: usize, missing: usize },
}

/// What happened to one declared file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashOutcome {
    /// Filtered out or unclassifiable; recorded nowhere
    Excluded,
    Resolved { hash: String, url: String },
    Missing { hash: String, description: String },
}

/// Outcomes of one game, folded per hash (first outcome wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameOutcome {
    pub links: IndexMap<String, String>,
    pub missing: IndexMap<String, String>,
    pub excluded: usize,
}

impl GameOutcome {
    fn fold(outcomes: Vec<HashOutcome>) -> Self {
        let mut game = Self::default();
        for outcome in outcomes {
            match outcome {
                HashOutcome::Excluded => game.excluded += 1,
                HashOutcome::Resolved { hash, url } => {
                    game.links.entry(hash).or_insert(url);
                }
                HashOutcome::Missing { hash, description } => {
                    game.missing.entry(hash).or_insert(description);
                }
            }
        }
        game
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Ids skipped before any fetch
    pub excluded_ids: HashSet<GameId>,
    /// Pause after each game's metadata fetch
    pub game_delay: Duration,
    pub exclusion: ExclusionRules,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            excluded_ids: crate::settings::DEFAULT_EXCLUDED_GAME_IDS
                .iter()
                .copied()
                .map(GameId)
                .collect(),
            game_delay: Duration::from_secs(10),
            exclusion: ExclusionRules::default(),
        }
    }
}

/// Accumulated results of a batch, in document shape.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub links: HashLinks,
    pub missing: MissingHashes,
    pub games_processed: usize,
    pub games_skipped: usize,
}

pub struct BatchRunner<'a, S, P> {
    source: &'a S,
    resolver: &'a ArchiveResolver<P>,
    options: BatchOptions,
}

impl<'a, S: GameSource, P: Probe> BatchRunner<'a, S, P> {
    pub fn new(source: &'a S, resolver: &'a ArchiveResolver<P>, options: BatchOptions) -> Self {
        Self {
            source,
            resolver,
            options,
        }
    }

    /// Classify one file and look for it on the archive.
    pub async fn resolve_entry(&self, entry: &HashEntry, console: &str) -> HashOutcome {
        if let Some(reason) = exclusion(entry, console, &self.options.exclusion) {
            log::debug!("Skipping {}: {reason}", entry.declared_name);
            return HashOutcome::Excluded;
        }
        let Some(group) = classify_labels(&entry.labels) else {
            log::debug!(
                "Skipping {}: no dump group for labels [{}]",
                entry.declared_name,
                entry.labels.join(",")
            );
            return HashOutcome::Excluded;
        };

        let hash = entry.key();
        match self
            .resolver
            .resolve(group, console, &entry.declared_name)
            .await
        {
            Some(url) if self.resolver.layout().is_trusted(&url) => HashOutcome::Resolved { hash, url },
            Some(url) => {
                log::warn!("Ignoring {url} for {}: host is not trusted", entry.declared_name);
                HashOutcome::Missing {
                    hash,
                    description: entry.diagnostic(console),
                }
            }
            None => HashOutcome::Missing {
                hash,
                description: entry.diagnostic(console),
            },
        }
    }

    /// Resolve every file of a game concurrently.
    pub async fn resolve_game(&self, record: &GameRecord) -> GameOutcome {
        let outcomes = join_all(
            record
                .hash_entries
                .iter()
                .map(|entry| self.resolve_entry(entry, &record.console_name)),
        )
        .await;
        GameOutcome::fold(outcomes)
    }

    /// Process `ids` in order, reporting progress on `events`.
    ///
    /// Per-game failures never abort the batch: a failed fetch skips that
    /// game and is not recorded as missing.
    pub async fn run(&self, ids: &[GameId], events: mpsc::UnboundedSender<BatchEvent>) -> BatchResult {
        let mut result = BatchResult::default();
        let total = ids.len();

        for (index, &id) in ids.iter().enumerate() {
            if self.options.excluded_ids.contains(&id) {
                log::debug!("Skipping excluded game {id}");
                result.games_skipped += 1;
                let _ = events.send(BatchEvent::GameSkipped {
                    id,
                    reason: "excluded id".to_string(),
                });
                continue;
            }

            let _ = events.send(BatchEvent::GameStarted { index, total, id });
            log::info!("Processing game {id} ({}/{total})", index + 1);

            let fetched = self.source.game_record(id).await;
            if !self.options.game_delay.is_zero() {
                tokio::time::sleep(self.options.game_delay).await;
            }

            let record = match fetched {
                Ok(record) => record,
                Err(e) => {
                    log::error!("Error fetching API data for game {id}: {e}");
                    result.games_skipped += 1;
                    let _ = events.send(BatchEvent::GameSkipped {
                        id,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let _ = events.send(BatchEvent::GameFetched {
                id,
                console: record.console_name.clone(),
                entries: record.hash_entries.len(),
            });

            let game = self.resolve_game(&record).await;
            log::info!(
                "Game {id} ({}): {} linked, {} missing, {} excluded",
                record.console_name,
                game.links.len(),
                game.missing.len(),
                game.excluded
            );
            let _ = events.send(BatchEvent::GameFinished {
                id,
                resolved: game.links.len(),
                missing: game.missing.len(),
                excluded: game.excluded,
            });

            for (hash, description) in &game.missing {
                result.missing.insert_if_absent(id, hash, description);
            }
            result.links.push_group(id, game.links);
            result.games_processed += 1;
        }

        let _ = events.send(BatchEvent::Done {
            resolved: result.links.hash_count(),
            missing: result.missing.hash_count(),
        });
        result
    }
}
