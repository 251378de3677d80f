/// Errors talking to the upstream metadata API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure. The request URL is stripped since it carries the key.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status { status: u16, endpoint: String },

    #[error("Malformed response from {endpoint}: {source}")]
    Json {
        endpoint: String,
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.without_url())
    }
}

impl ApiError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
