use thiserror::Error;

/// Errors loading the archive folder taxonomy.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
}
