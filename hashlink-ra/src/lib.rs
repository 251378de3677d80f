pub mod client;
pub mod credentials;
pub mod error;
pub mod feed;
pub mod types;

pub use client::{DEFAULT_BASE_URL, GameSource, RaClient};
pub use credentials::{
    API_KEY_ENV, CredentialSource, api_key_source, load_api_key, mask_key, resolve_api_key,
};
pub use error::ApiError;
pub use feed::{ClaimFeed, dedup_ids, parse_timestamp, recent_claims};
pub use types::{Claim, GameHashesResponse, GameResponse, HashRecord};
