//! Folding a run's results into the persisted documents.
//!
//! Every merge is first-write-wins: a hash that already has a URL or a
//! description keeps it. Reconciliation then drops missing entries that
//! have since been resolved, so the two documents never share a hash.

use hashlink_core::{HashLinks, MissingHashes};

/// How many resolved hashes of a batch were new to the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub existing: usize,
}

impl MergeStats {
    pub fn total(&self) -> usize {
        self.added + self.existing
    }
}

/// Count new vs already-present hashes without touching the document.
pub fn count_new(doc: &HashLinks, batch: &HashLinks) -> MergeStats {
    let mut stats = MergeStats::default();
    for (id, hash, _) in batch.links() {
        if doc.contains(id, hash) {
            stats.existing += 1;
        } else {
            stats.added += 1;
        }
    }
    stats
}

/// Merge resolved links into `doc`.
///
/// New hashes go into the first object of their game's list; existing
/// mappings are never overwritten.
pub fn merge_links(doc: &mut HashLinks, batch: &HashLinks) -> MergeStats {
    let mut stats = MergeStats::default();
    for (id, hash, url) in batch.links() {
        if doc.insert_if_absent(id, hash, url) {
            stats.added += 1;
        } else {
            stats.existing += 1;
        }
    }
    stats
}

/// Merge missing-hash descriptions into `doc`. Returns how many were added.
pub fn merge_missing(doc: &mut MissingHashes, batch: &MissingHashes) -> usize {
    batch
        .entries()
        .filter(|(id, hash, description)| doc.insert_if_absent(*id, hash, description))
        .count()
}

/// Remove every missing entry whose hash is now linked for the same game.
///
/// Games left without entries are removed. Returns how many hashes were dropped.
pub fn reconcile(missing: &mut MissingHashes, links: &HashLinks) -> usize {
    let removed = missing.retain(|id, hash| !links.contains(id, hash));
    if removed > 0 {
        log::info!("Removed {removed} missing hashes that are now linked");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashlink_core::GameId;

    fn links(entries: &[(u64, &str, &str)]) -> HashLinks {
        let mut doc = HashLinks::new();
        for (id, hash, url) in entries {
            doc.insert_if_absent(GameId(*id), hash, url);
        }
        doc
    }

    #[test]
    fn merge_is_idempotent() {
        let batch = links(&[(1, "AA", "https://a/1"), (2, "BB", "https://a/2")]);
        let mut doc = HashLinks::new();

        let first = merge_links(&mut doc, &batch);
        let snapshot = doc.clone();
        let second = merge_links(&mut doc, &batch);

        assert_eq!(first, MergeStats { added: 2, existing: 0 });
        assert_eq!(second, MergeStats { added: 0, existing: 2 });
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn existing_url_is_never_overwritten() {
        let mut doc = links(&[(1, "AA", "https://old")]);
        merge_links(&mut doc, &links(&[(1, "AA", "https://new"), (1, "CC", "https://c")]));
        assert_eq!(doc.url(GameId(1), "AA"), Some("https://old"));
        assert_eq!(doc.url(GameId(1), "CC"), Some("https://c"));
    }

    #[test]
    fn count_new_matches_merge() {
        let doc = links(&[(1, "AA", "https://old")]);
        let batch = links(&[(1, "AA", "https://x"), (1, "BB", "https://y")]);
        let counted = count_new(&doc, &batch);
        let mut merged = doc.clone();
        assert_eq!(counted, merge_links(&mut merged, &batch));
        assert_eq!(counted.total(), 2);
    }

    #[test]
    fn missing_merge_is_first_write_wins() {
        let mut doc = MissingHashes::new();
        doc.insert_if_absent(GameId(5), "AA", "old description");
        let mut batch = MissingHashes::new();
        batch.insert_if_absent(GameId(5), "AA", "new description");
        batch.insert_if_absent(GameId(3), "BB", "other");

        assert_eq!(merge_missing(&mut doc, &batch), 1);
        assert_eq!(doc.description(GameId(5), "AA"), Some("old description"));
        assert_eq!(doc.description(GameId(3), "BB"), Some("other"));
    }

    #[test]
    fn reconcile_makes_documents_disjoint() {
        let doc = links(&[(1, "AA", "https://a"), (2, "CC", "https://c")]);
        let mut missing = MissingHashes::new();
        missing.insert_if_absent(GameId(1), "AA", "now found");
        missing.insert_if_absent(GameId(1), "BB", "still missing");
        missing.insert_if_absent(GameId(2), "CC", "now found");
        // same hash under a different game stays
        missing.insert_if_absent(GameId(3), "AA", "different game");

        assert_eq!(reconcile(&mut missing, &doc), 2);
        assert!(!missing.contains(GameId(1), "AA"));
        assert!(missing.contains(GameId(1), "BB"));
        assert!(missing.get(GameId(2)).is_none());
        assert!(missing.contains(GameId(3), "AA"));

        for (id, hash, _) in doc.links() {
            assert!(!missing.contains(id, hash));
        }
    }
}
