//! Persistence for the resolved-links and missing-hashes documents.
//!
//! This crate owns the merge rules (first write wins, resolved hashes are
//! removed from the missing set), atomic full-document rewrites, entry
//! counting, and the README status block.

pub mod count;
pub mod document;
pub mod error;
pub mod merge;
pub mod readme;

pub use count::{count_file, count_hashes, with_thousands};
pub use document::{
    corrupt_path, load_document, load_links, load_missing, save_document, save_links,
    save_missing,
};
pub use error::StoreError;
pub use merge::{MergeStats, count_new, merge_links, merge_missing, reconcile};
pub use readme::{replace_block, status_block, status_date, update_readme};
