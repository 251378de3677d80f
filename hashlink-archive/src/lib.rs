//! Guessing and verifying archive download URLs.
//!
//! A [`Taxonomy`] says which folders each dump group keeps a console in,
//! [`plan_candidates`] expands a declared file name into ordered URLs, and
//! [`ArchiveResolver`] probes them until one exists.

pub mod candidates;
pub mod error;
pub mod probe;
pub mod resolve;
pub mod taxonomy;

pub use candidates::{ArchiveLayout, CandidatePlan, plan_candidates};
pub use error::TaxonomyError;
pub use probe::{HttpProbe, Probe, request_url};
pub use resolve::ArchiveResolver;
pub use taxonomy::{FolderSpec, PriorityMirror, Taxonomy};
