use hashlink_core::{GameId, HashEntry};
use serde::Deserialize;

/// Response of `API_GetGameHashes.php`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameHashesResponse {
    #[serde(rename = "Results", default)]
    pub results: Option<Vec<HashRecord>>,
}

/// One declared file of a game as reported upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct HashRecord {
    #[serde(rename = "MD5")]
    pub md5: String,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Labels", default)]
    pub labels: Option<Vec<String>>,
    #[serde(rename = "PatchUrl", default)]
    pub patch_url: Option<String>,
}

impl From<HashRecord> for HashEntry {
    fn from(record: HashRecord) -> Self {
        HashEntry {
            content_hash: record.md5,
            declared_name: record.name.unwrap_or_default(),
            labels: record.labels.unwrap_or_default(),
            patch_url: record.patch_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Response of `API_GetGame.php`; only the fields the resolver reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameResponse {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "ConsoleName", default)]
    pub console_name: Option<String>,
}

impl GameResponse {
    pub fn console_name(&self) -> &str {
        self.console_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown")
    }
}

/// A set claim from `API_GetClaims.php` or `API_GetActiveClaims.php`.
#[derive(Debug, Clone, Deserialize)]
pub struct Claim {
    #[serde(rename = "GameID")]
    pub game_id: GameId,
    #[serde(rename = "DoneTime", default)]
    pub done_time: Option<String>,
    #[serde(rename = "ClaimedAt", default)]
    pub claimed_at: Option<String>,
}
