//! Loading and saving the two JSON documents.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hashlink_core::{HashLinks, MissingHashes};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Load a document, treating a missing file as empty.
///
/// A file that exists but does not parse is copied to a timestamped
/// `<file>.corrupt-*` backup and treated as empty, so the next save cannot
/// destroy the only copy.
pub fn load_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("{} does not exist yet, starting empty", path.display());
            return Ok(T::default());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    if contents.trim().is_empty() {
        return Ok(T::default());
    }

    match serde_json::from_str(&contents) {
        Ok(doc) => Ok(doc),
        Err(e) => {
            let backup = corrupt_path(path, Utc::now());
            log::error!(
                "Error parsing JSON from {}: {e}. Treating it as empty; original copied to {}",
                path.display(),
                backup.display()
            );
            std::fs::copy(path, &backup).map_err(|e| StoreError::io(&backup, e))?;
            Ok(T::default())
        }
    }
}

/// Write a document as 2-space indented JSON, atomically.
pub fn save_document<T: Serialize>(path: &Path, doc: &T) -> Result<(), StoreError> {
    let serialized = serde_json::to_string_pretty(doc).map_err(|e| StoreError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    write_atomic(path, serialized.as_bytes())
}

/// Write to a sibling temp file, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let tmp = sibling_with_suffix(path, ".tmp");
    std::fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

/// First unused backup path for `path`: `<file>.corrupt-20261019T083000Z`,
/// then `-1`, `-2`, ... when a backup from the same second exists.
pub fn corrupt_path(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let stamp = format!(".corrupt-{}", now.format("%Y%m%dT%H%M%SZ"));
    let first = sibling_with_suffix(path, &stamp);
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| sibling_with_suffix(path, &format!("{stamp}-{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

pub fn load_links(path: &Path) -> Result<HashLinks, StoreError> {
    load_document(path)
}

pub fn load_missing(path: &Path) -> Result<MissingHashes, StoreError> {
    load_document(path)
}

pub fn save_links(path: &Path, doc: &HashLinks) -> Result<(), StoreError> {
    save_document(path, doc)?;
    log::info!(
        "Saved {} links for {} games to {}",
        doc.hash_count(),
        doc.game_count(),
        path.display()
    );
    Ok(())
}

pub fn save_missing(path: &Path, doc: &MissingHashes) -> Result<(), StoreError> {
    save_document(path, doc)?;
    log::info!(
        "Saved {} missing hashes for {} games to {}",
        doc.hash_count(),
        doc.game_count(),
        path.display()
    );
    Ok(())
}
