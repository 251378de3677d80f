use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Settings file or API key problem
    #[error("Config error: {0}")]
    Config(String),

    /// Upstream API failure outside the per-game loop
    #[error("API error: {0}")]
    Api(String),

    /// Archive taxonomy could not be loaded
    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    /// Reading or writing a document failed
    #[error("Store error: {0}")]
    Store(String),

    /// HTTP client setup failed
    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<hashlink_pipeline::SettingsError> for CliError {
    fn from(e: hashlink_pipeline::SettingsError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<hashlink_ra::ApiError> for CliError {
    fn from(e: hashlink_ra::ApiError) -> Self {
        match e {
            hashlink_ra::ApiError::Config(msg) => Self::Config(msg),
            other => Self::Api(other.to_string()),
        }
    }
}

impl From<hashlink_archive::TaxonomyError> for CliError {
    fn from(e: hashlink_archive::TaxonomyError) -> Self {
        Self::Taxonomy(e.to_string())
    }
}

impl From<hashlink_store::StoreError> for CliError {
    fn from(e: hashlink_store::StoreError) -> Self {
        Self::Store(e.to_string())
    }
}
