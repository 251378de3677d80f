//! Shared data model for the hashlink pipeline.
//!
//! Defines the records fetched from the upstream metadata API, the two
//! persisted documents (resolved links and missing hashes), the dump-group
//! classifier, and the file-name cleaning used to guess archive file names.

pub mod dump_group;
pub mod filename;
pub mod types;

pub use dump_group::{
    DumpGroup, DumpGroupParseError, Exclusion, ExclusionRules, GROUP_RULES, GroupRule, classify,
    classify_labels, exclusion,
};
pub use filename::{name_variants, strip_extension};
pub use types::{
    GameId, GameIdParseError, GameRecord, HashEntry, HashLinks, MissingHashes, canonical_hash,
};
