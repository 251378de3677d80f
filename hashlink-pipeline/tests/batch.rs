use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use hashlink_archive::{ArchiveLayout, ArchiveResolver, Probe, Taxonomy};
use hashlink_core::{ExclusionRules, GameId, GameRecord, HashEntry};
use hashlink_pipeline::{
    BatchEvent, BatchOptions, BatchResult, BatchRunner, PersistOptions, apply_batch, summary_text,
};
use hashlink_ra::{ApiError, GameSource};
use tokio::sync::mpsc;

const ROOT: &str = "https://archive.test/files/";
const HASH: &str = "abc123def4567890abc123def4567890";

struct FakeSource {
    games: HashMap<GameId, Result<GameRecord, u16>>,
    fetched: RefCell<Vec<GameId>>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            games: HashMap::new(),
            fetched: RefCell::new(Vec::new()),
        }
    }

    fn with_game(mut self, id: u64, console: &str, entries: Vec<HashEntry>) -> Self {
        let record = GameRecord {
            id: GameId(id),
            console_name: console.to_string(),
            hash_entries: entries,
        };
        self.games.insert(GameId(id), Ok(record));
        self
    }

    fn failing(mut self, id: u64, status: u16) -> Self {
        self.games.insert(GameId(id), Err(status));
        self
    }
}

impl GameSource for FakeSource {
    async fn game_record(&self, id: GameId) -> Result<GameRecord, ApiError> {
        self.fetched.borrow_mut().push(id);
        match self.games.get(&id) {
            Some(Ok(record)) => Ok(record.clone()),
            Some(Err(status)) => Err(ApiError::Status {
                status: *status,
                endpoint: "API_GetGame.php".to_string(),
            }),
            None => Err(ApiError::Status {
                status: 404,
                endpoint: "API_GetGame.php".to_string(),
            }),
        }
    }
}

struct FakeProbe {
    hits: HashSet<String>,
}

impl FakeProbe {
    fn serving(urls: &[&str]) -> Self {
        Self {
            hits: urls.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl Probe for FakeProbe {
    async fn exists(&self, url: &str) -> bool {
        self.hits.contains(url)
    }
}

fn test_layout() -> ArchiveLayout {
    let mut layout = ArchiveLayout::new(ROOT);
    layout.trusted_prefixes = vec![ROOT.to_string()];
    layout
}

fn options() -> BatchOptions {
    BatchOptions {
        game_delay: Duration::ZERO,
        ..BatchOptions::default()
    }
}

fn redump_entry(name: &str) -> HashEntry {
    HashEntry::new(HASH, name).with_label("redump")
}

async fn run_batch(
    source: &FakeSource,
    resolver: &ArchiveResolver<FakeProbe>,
    options: BatchOptions,
    ids: &[u64],
) -> (BatchResult, Vec<BatchEvent>) {
    let ids: Vec<GameId> = ids.iter().copied().map(GameId).collect();
    let runner = BatchRunner::new(source, resolver, options);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let result = runner.run(&ids, tx).await;
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    (result, events)
}

#[tokio::test]
async fn resolved_file_lands_in_links() {
    let target = "https://archive.test/files/Redump/Sony - PlayStation/Super Game (USA).zip";
    let source =
        FakeSource::new().with_game(19339, "PlayStation", vec![redump_entry("Super Game (USA).zip")]);
    let resolver = ArchiveResolver::new(
        Taxonomy::builtin().unwrap(),
        test_layout(),
        FakeProbe::serving(&[target]),
    );

    let (batch, events) = run_batch(&source, &resolver, options(), &[19339]).await;

    assert_eq!(batch.games_processed, 1);
    assert_eq!(
        batch.links.url(GameId(19339), &HASH.to_uppercase()),
        Some(target)
    );
    assert!(batch.missing.is_empty());
    assert!(matches!(
        events.last(),
        Some(BatchEvent::Done {
            resolved: 1,
            missing: 0
        })
    ));

    let dir = tempfile::TempDir::new().unwrap();
    let persist = PersistOptions {
        links_path: dir.path().join("hashlinks.json"),
        missing_path: dir.path().join("missinghashes.json"),
        readme_path: None,
        dry_run: false,
    };
    let now = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
    let summary = apply_batch(&batch, &persist, now).unwrap();
    assert_eq!(summary.stats.added, 1);
    assert_eq!(summary.linked_total, 1);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&persist.links_path).unwrap()).unwrap();
    assert_eq!(
        saved,
        serde_json::json!({ "19339": [{ HASH.to_uppercase(): target }] })
    );

    // Running the same batch again finds everything already present.
    let again = apply_batch(&batch, &persist, now).unwrap();
    assert_eq!(again.stats.added, 0);
    assert_eq!(again.stats.existing, 1);
    assert!(summary_text(&again.stats).unwrap().contains("Hashes already existed: 1"));
}

#[tokio::test]
async fn unresolved_file_is_recorded_missing() {
    let source =
        FakeSource::new().with_game(19339, "PlayStation", vec![redump_entry("Super Game (USA).zip")]);
    let resolver =
        ArchiveResolver::new(Taxonomy::builtin().unwrap(), test_layout(), FakeProbe::serving(&[]));

    let (batch, _) = run_batch(&source, &resolver, options(), &[19339]).await;

    assert!(batch.links.is_empty());
    let description = batch
        .missing
        .description(GameId(19339), &HASH.to_uppercase())
        .unwrap();
    assert!(description.contains("Super Game (USA).zip"));
    assert!(description.contains("PlayStation"));
    assert!(description.contains("redump"));
}

#[tokio::test]
async fn legacy_entries_are_recorded_nowhere() {
    let source = FakeSource::new().with_game(
        500,
        "PlayStation",
        vec![
            redump_entry("Super Game (USA) [legacy].zip"),
            HashEntry::new("ffff", "Other Game (USA).zip")
                .with_label("redump")
                .with_label("legacy"),
        ],
    );
    let resolver =
        ArchiveResolver::new(Taxonomy::builtin().unwrap(), test_layout(), FakeProbe::serving(&[]));

    let (batch, events) = run_batch(&source, &resolver, options(), &[500]).await;

    assert!(batch.links.is_empty());
    assert!(batch.missing.is_empty());
    assert!(events.iter().any(|e| matches!(
        e,
        BatchEvent::GameFinished {
            excluded: 2,
            resolved: 0,
            missing: 0,
            ..
        }
    )));
}

#[tokio::test]
async fn fetch_failure_skips_game_and_continues() {
    let target = "https://archive.test/files/Redump/Sony - PlayStation/Super Game (USA).zip";
    let source = FakeSource::new()
        .failing(1, 500)
        .with_game(2, "PlayStation", vec![redump_entry("Super Game (USA).zip")]);
    let resolver = ArchiveResolver::new(
        Taxonomy::builtin().unwrap(),
        test_layout(),
        FakeProbe::serving(&[target]),
    );

    let (batch, events) = run_batch(&source, &resolver, options(), &[1, 2]).await;

    assert_eq!(batch.games_skipped, 1);
    assert_eq!(batch.games_processed, 1);
    assert!(!batch.missing.contains(GameId(1), &HASH.to_uppercase()));
    assert!(batch.links.contains(GameId(2), &HASH.to_uppercase()));
    assert!(events.iter().any(|e| matches!(
        e,
        BatchEvent::GameSkipped { id: GameId(1), .. }
    )));
}

#[tokio::test]
async fn excluded_ids_are_never_fetched() {
    let source = FakeSource::new()
        .with_game(31888, "PlayStation", vec![redump_entry("Cheat (USA).zip")])
        .with_game(7, "PlayStation", vec![]);
    let resolver =
        ArchiveResolver::new(Taxonomy::builtin().unwrap(), test_layout(), FakeProbe::serving(&[]));

    let (batch, _) = run_batch(&source, &resolver, options(), &[31888, 7]).await;

    assert_eq!(*source.fetched.borrow(), vec![GameId(7)]);
    assert_eq!(batch.games_skipped, 1);
    assert!(batch.missing.is_empty());
}

#[tokio::test]
async fn hub_consoles_are_skipped() {
    let source = FakeSource::new().with_game(9, "Hubs", vec![redump_entry("Anything.zip")]);
    let resolver =
        ArchiveResolver::new(Taxonomy::builtin().unwrap(), test_layout(), FakeProbe::serving(&[]));

    let (batch, _) = run_batch(&source, &resolver, options(), &[9]).await;
    assert!(batch.missing.is_empty());

    let no_marker = BatchOptions {
        exclusion: ExclusionRules {
            console_marker: None,
        },
        ..options()
    };
    let (batch, _) = run_batch(&source, &resolver, no_marker, &[9]).await;
    assert!(batch.missing.contains(GameId(9), &HASH.to_uppercase()));
}

#[tokio::test]
async fn untrusted_host_is_recorded_missing() {
    let target = "https://archive.test/files/Redump/Sony - PlayStation/Super Game (USA).zip";
    let source =
        FakeSource::new().with_game(19339, "PlayStation", vec![redump_entry("Super Game (USA).zip")]);
    let mut layout = test_layout();
    layout.trusted_prefixes = vec!["https://elsewhere.test/".to_string()];
    let resolver =
        ArchiveResolver::new(Taxonomy::builtin().unwrap(), layout, FakeProbe::serving(&[target]));

    let (batch, _) = run_batch(&source, &resolver, options(), &[19339]).await;

    assert!(batch.links.is_empty());
    assert!(batch.missing.contains(GameId(19339), &HASH.to_uppercase()));
}

#[tokio::test]
async fn found_hash_is_reconciled_out_of_missing() {
    let target = "https://archive.test/files/Redump/Sony - PlayStation/Super Game (USA).zip";
    let dir = tempfile::TempDir::new().unwrap();
    let persist = PersistOptions {
        links_path: dir.path().join("hashlinks.json"),
        missing_path: dir.path().join("missinghashes.json"),
        readme_path: None,
        dry_run: false,
    };
    std::fs::write(
        &persist.missing_path,
        format!(
            "{{\"19339\": {{\"{}\": \"Super Game (USA).zip - PlayStation - redump\"}}}}",
            HASH.to_uppercase()
        ),
    )
    .unwrap();

    let source =
        FakeSource::new().with_game(19339, "PlayStation", vec![redump_entry("Super Game (USA).zip")]);
    let resolver = ArchiveResolver::new(
        Taxonomy::builtin().unwrap(),
        test_layout(),
        FakeProbe::serving(&[target]),
    );
    let (batch, _) = run_batch(&source, &resolver, options(), &[19339]).await;

    let now = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
    let summary = apply_batch(&batch, &persist, now).unwrap();
    assert_eq!(summary.reconciled, 1);
    assert_eq!(summary.missing_total, 0);
}

#[tokio::test]
async fn dry_run_leaves_documents_untouched() {
    let target = "https://archive.test/files/Redump/Sony - PlayStation/Super Game (USA).zip";
    let source =
        FakeSource::new().with_game(19339, "PlayStation", vec![redump_entry("Super Game (USA).zip")]);
    let resolver = ArchiveResolver::new(
        Taxonomy::builtin().unwrap(),
        test_layout(),
        FakeProbe::serving(&[target]),
    );
    let (batch, _) = run_batch(&source, &resolver, options(), &[19339]).await;

    let dir = tempfile::TempDir::new().unwrap();
    let persist = PersistOptions {
        links_path: dir.path().join("hashlinks.json"),
        missing_path: dir.path().join("missinghashes.json"),
        readme_path: None,
        dry_run: true,
    };
    let now = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
    let summary = apply_batch(&batch, &persist, now).unwrap();

    assert_eq!(summary.stats.added, 1);
    assert!(!persist.links_path.exists());
    assert!(!persist.missing_path.exists());
}

#[tokio::test(start_paused = true)]
async fn delay_follows_every_fetch_but_not_excluded_ids() {
    let delay = Duration::from_secs(10);
    let source = FakeSource::new()
        .with_game(1, "PlayStation", vec![])
        .failing(2, 503)
        .with_game(31888, "PlayStation", vec![]);
    let resolver =
        ArchiveResolver::new(Taxonomy::builtin().unwrap(), test_layout(), FakeProbe::serving(&[]));
    let options = BatchOptions {
        game_delay: delay,
        ..BatchOptions::default()
    };

    let start = tokio::time::Instant::now();
    let (batch, _) = run_batch(&source, &resolver, options, &[1, 2, 31888]).await;

    assert_eq!(start.elapsed(), delay * 2);
    assert_eq!(*source.fetched.borrow(), vec![GameId(1), GameId(2)]);
    assert_eq!(batch.games_processed, 1);
    assert_eq!(batch.games_skipped, 2);
}

/// Misses everything, tracking how many lookups overlap.
#[derive(Default)]
struct CountingProbe {
    in_flight: Cell<usize>,
    max_in_flight: Cell<usize>,
}

impl Probe for CountingProbe {
    async fn exists(&self, _url: &str) -> bool {
        let now = self.in_flight.get() + 1;
        self.in_flight.set(now);
        self.max_in_flight.set(self.max_in_flight.get().max(now));
        tokio::task::yield_now().await;
        self.in_flight.set(self.in_flight.get() - 1);
        false
    }
}

#[tokio::test]
async fn files_of_one_game_are_probed_concurrently() {
    let source = FakeSource::new().with_game(
        19339,
        "PlayStation",
        vec![
            HashEntry::new("aa", "Disc A (USA).zip").with_label("redump"),
            HashEntry::new("bb", "Disc B (USA).zip").with_label("redump"),
            HashEntry::new("cc", "Disc C (USA).zip").with_label("redump"),
        ],
    );
    let resolver = ArchiveResolver::new(
        Taxonomy::builtin().unwrap(),
        test_layout(),
        CountingProbe::default(),
    );
    let runner = BatchRunner::new(&source, &resolver, options());
    let (tx, _rx) = mpsc::unbounded_channel();

    let batch = runner.run(&[GameId(19339)], tx).await;

    assert_eq!(batch.missing.hash_count(), 3);
    assert!(resolver.probe().max_in_flight.get() > 1);
    assert_eq!(resolver.probe().in_flight.get(), 0);
}
