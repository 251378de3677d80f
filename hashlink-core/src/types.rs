use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Upstream game identifier.
///
/// Serialized as a plain number in API payloads and as a decimal string when
/// used as a JSON object key. Deserializes from either form, so `"007"` and
/// `7` normalize to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GameIdVisitor;

        impl serde::de::Visitor<'_> for GameIdVisitor {
            type Value = GameId;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a game id as a number or numeric string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<GameId, E> {
                Ok(GameId(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<GameId, E> {
                u64::try_from(v)
                    .map(GameId)
                    .map_err(|_| E::custom(format!("negative game id {v}")))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<GameId, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(GameIdVisitor)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid game id.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid game id: '{0}'")]
pub struct GameIdParseError(pub String);

impl std::str::FromStr for GameId {
    type Err = GameIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(GameId)
            .map_err(|_| GameIdParseError(s.to_string()))
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        GameId(id)
    }
}

/// Canonical form of a content hash used as a document key (uppercase hex).
pub fn canonical_hash(hash: &str) -> String {
    hash.trim().to_uppercase()
}

/// One declared file variant of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashEntry {
    /// Hex digest as reported upstream (any case)
    pub content_hash: String,
    /// Nominal file name, possibly with `<...>` decorations
    pub declared_name: String,
    /// Cataloguing tags such as `nointro` or `redump`
    pub labels: Vec<String>,
    /// Patch download, only used for diagnostics
    pub patch_url: Option<String>,
}

impl HashEntry {
    pub fn new(content_hash: impl Into<String>, declared_name: impl Into<String>) -> Self {
        Self {
            content_hash: content_hash.into(),
            declared_name: declared_name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_patch_url(mut self, url: impl Into<String>) -> Self {
        self.patch_url = Some(url.into());
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// The hash as stored in the persisted documents.
    pub fn key(&self) -> String {
        canonical_hash(&self.content_hash)
    }

    /// Human-readable description recorded for a hash no archive URL was found for.
    pub fn diagnostic(&self, console_name: &str) -> String {
        let mut text = format!(
            "{} - {} - {}",
            self.declared_name,
            console_name,
            self.labels.join(",")
        );
        if let Some(ref url) = self.patch_url {
            text.push_str(" - ");
            text.push_str(url);
        }
        text
    }
}

/// A game with its console and declared file variants, fetched fresh per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: GameId,
    pub console_name: String,
    pub hash_entries: Vec<HashEntry>,
}

/// Resolved mapping: game id → list of `{HASH: url}` objects.
///
/// A hash appears in at most one object of a game's list. Top-level keys are
/// kept in ascending numeric order; hashes keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashLinks(BTreeMap<GameId, Vec<IndexMap<String, String>>>);

impl HashLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `hash` is mapped for `id` in any of the game's objects.
    pub fn contains(&self, id: GameId, hash: &str) -> bool {
        self.0
            .get(&id)
            .is_some_and(|groups| groups.iter().any(|g| g.contains_key(hash)))
    }

    /// The URL mapped for `hash`, if any.
    pub fn url(&self, id: GameId, hash: &str) -> Option<&str> {
        self.0
            .get(&id)?
            .iter()
            .find_map(|g| g.get(hash))
            .map(String::as_str)
    }

    /// Map `hash` to `url` unless the game already maps it. New hashes land in
    /// the game's first object, which is created when the game is new.
    ///
    /// Returns `true` if the mapping was added.
    pub fn insert_if_absent(&mut self, id: GameId, hash: &str, url: &str) -> bool {
        if self.contains(id, hash) {
            return false;
        }
        let groups = self.0.entry(id).or_default();
        if groups.is_empty() {
            groups.push(IndexMap::new());
        }
        groups[0].insert(hash.to_string(), url.to_string());
        true
    }

    /// Append a whole object of links for a game (used for per-run batches).
    pub fn push_group(&mut self, id: GameId, links: IndexMap<String, String>) {
        if links.is_empty() {
            return;
        }
        self.0.entry(id).or_default().push(links);
    }

    /// Iterate `(id, hash, url)` triples in document order.
    pub fn links(&self) -> impl Iterator<Item = (GameId, &str, &str)> {
        self.0.iter().flat_map(|(id, groups)| {
            groups
                .iter()
                .flat_map(move |g| g.iter().map(move |(h, u)| (*id, h.as_str(), u.as_str())))
        })
    }

    pub fn game_ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.0.keys().copied()
    }

    pub fn get(&self, id: GameId) -> Option<&[IndexMap<String, String>]> {
        self.0.get(&id).map(Vec::as_slice)
    }

    /// Number of games with at least one entry (possibly empty objects).
    pub fn game_count(&self) -> usize {
        self.0.len()
    }

    /// Total number of mapped hashes across all games and objects.
    pub fn hash_count(&self) -> usize {
        self.links().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unresolved hashes: game id → `{HASH: diagnostic}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissingHashes(BTreeMap<GameId, IndexMap<String, String>>);

impl MissingHashes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: GameId, hash: &str) -> bool {
        self.0.get(&id).is_some_and(|m| m.contains_key(hash))
    }

    pub fn description(&self, id: GameId, hash: &str) -> Option<&str> {
        self.0.get(&id)?.get(hash).map(String::as_str)
    }

    /// Record a missing hash unless one is already recorded for the game.
    ///
    /// Returns `true` if the entry was added.
    pub fn insert_if_absent(&mut self, id: GameId, hash: &str, description: &str) -> bool {
        let entries = self.0.entry(id).or_default();
        if entries.contains_key(hash) {
            return false;
        }
        entries.insert(hash.to_string(), description.to_string());
        true
    }

    /// Drop every entry for which `keep` returns false, then drop games left empty.
    ///
    /// Returns the number of hash entries removed.
    pub fn retain(&mut self, mut keep: impl FnMut(GameId, &str) -> bool) -> usize {
        let mut removed = 0;
        for (id, entries) in self.0.iter_mut() {
            let before = entries.len();
            entries.retain(|hash, _| keep(*id, hash));
            removed += before - entries.len();
        }
        self.0.retain(|_, entries| !entries.is_empty());
        removed
    }

    /// Iterate `(id, hash, description)` triples in document order.
    pub fn entries(&self) -> impl Iterator<Item = (GameId, &str, &str)> {
        self.0.iter().flat_map(|(id, m)| {
            m.iter()
                .map(move |(h, d)| (*id, h.as_str(), d.as_str()))
        })
    }

    pub fn game_ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.0.keys().copied()
    }

    pub fn get(&self, id: GameId) -> Option<&IndexMap<String, String>> {
        self.0.get(&id)
    }

    pub fn game_count(&self) -> usize {
        self.0.len()
    }

    pub fn hash_count(&self) -> usize {
        self.0.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
