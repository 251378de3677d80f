//! Orchestration of a hash-link run: settings, the per-game batch loop,
//! merging into the persisted documents and the end-of-run summary.

pub mod async_util;
pub mod batch;
pub mod error;
pub mod persist;
pub mod report;
pub mod settings;

pub use batch::{BatchEvent, BatchOptions, BatchResult, BatchRunner, GameOutcome, HashOutcome};
pub use error::SettingsError;
pub use persist::{PersistOptions, RunSummary, apply_batch};
pub use report::summary_text;
pub use settings::{
    ArchiveSettings, DEFAULT_EXCLUDED_GAME_IDS, Settings, UpstreamSettings, settings_path,
};
