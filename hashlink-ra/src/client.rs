use std::time::Duration;

use chrono::{DateTime, Utc};
use hashlink_core::{GameId, GameRecord, HashEntry};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::feed::{ClaimFeed, dedup_ids, recent_claims};
use crate::types::{Claim, GameHashesResponse, GameResponse};

pub const DEFAULT_BASE_URL: &str = "https://retroachievements.org/API";

/// Source of per-game metadata for a resolution run.
#[allow(async_fn_in_trait)]
pub trait GameSource {
    /// Fetch a game's console and declared files.
    async fn game_record(&self, id: GameId) -> Result<GameRecord, ApiError>;
}

/// HTTP client for the RetroAchievements web API.
pub struct RaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RaClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::config("API key is empty"));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hashlink/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(format!("{}/{endpoint}", self.base_url))
            .query(params)
            .query(&[("y", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Json {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }

    /// Declared files of a game (`API_GetGameHashes.php`).
    pub async fn game_hashes(&self, id: GameId) -> Result<Vec<HashEntry>, ApiError> {
        let resp: GameHashesResponse = self
            .get_json("API_GetGameHashes.php", &[("i", id.to_string())])
            .await?;
        Ok(resp
            .results
            .unwrap_or_default()
            .into_iter()
            .map(HashEntry::from)
            .collect())
    }

    /// Game metadata (`API_GetGame.php`).
    pub async fn game(&self, id: GameId) -> Result<GameResponse, ApiError> {
        self.get_json("API_GetGame.php", &[("i", id.to_string())])
            .await
    }

    pub async fn claims(&self, feed: ClaimFeed) -> Result<Vec<Claim>, ApiError> {
        self.get_json(feed.endpoint(), &feed.params()).await
    }

    /// Games with claims completed or opened within `window` before `now`.
    ///
    /// Feeds are polled one after another. A feed that fails is logged and
    /// skipped.
    pub async fn recent_game_ids(&self, window: chrono::Duration, now: DateTime<Utc>) -> Vec<GameId> {
        let cutoff = now - window;
        let mut lists = Vec::with_capacity(ClaimFeed::ALL.len());
        for feed in ClaimFeed::ALL {
            match self.claims(feed).await {
                Ok(claims) => {
                    let ids = recent_claims(feed, &claims, cutoff);
                    log::debug!("{feed}: {} claims, {} recent", claims.len(), ids.len());
                    lists.push(ids);
                }
                Err(e) => log::error!("Error fetching claims from {feed}: {e}"),
            }
        }
        let ids = dedup_ids(lists);
        log::info!(
            "{} unique game ids with claims since {}",
            ids.len(),
            cutoff.format("%Y-%m-%d %H:%M UTC")
        );
        ids
    }
}

impl GameSource for RaClient {
    async fn game_record(&self, id: GameId) -> Result<GameRecord, ApiError> {
        let (hash_entries, game) = tokio::try_join!(self.game_hashes(id), self.game(id))?;
        Ok(GameRecord {
            id,
            console_name: game.console_name().to_string(),
            hash_entries,
        })
    }
}
