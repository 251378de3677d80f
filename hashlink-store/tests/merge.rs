use chrono::{TimeZone, Utc};
use hashlink_core::{GameId, HashLinks, MissingHashes};
use hashlink_store::*;
use indexmap::IndexMap;
use tempfile::TempDir;

fn batch_links(id: u64, pairs: &[(&str, &str)]) -> HashLinks {
    let mut batch = HashLinks::new();
    let group: IndexMap<String, String> = pairs
        .iter()
        .map(|(h, u)| (h.to_string(), u.to_string()))
        .collect();
    batch.push_group(GameId(id), group);
    batch
}

#[test]
fn full_cycle_on_disk_keeps_documents_disjoint() {
    let dir = TempDir::new().unwrap();
    let links_path = dir.path().join("hashlinks.json");
    let missing_path = dir.path().join("missinghashes.json");

    std::fs::write(
        &missing_path,
        r#"{"19339": {"ABC123": "Super Game (USA).zip - PlayStation - redump"}, "7": {"FF": "x"}}"#,
    )
    .unwrap();

    let mut links = load_links(&links_path).unwrap();
    let mut missing = load_missing(&missing_path).unwrap();
    assert!(links.is_empty());

    let stats = merge_links(
        &mut links,
        &batch_links(19339, &[("ABC123", "https://archive.test/Redump/Super Game (USA).zip")]),
    );
    assert_eq!(stats, MergeStats { added: 1, existing: 0 });
    assert_eq!(reconcile(&mut missing, &links), 1);

    save_links(&links_path, &links).unwrap();
    save_missing(&missing_path, &missing).unwrap();

    let written_links = std::fs::read_to_string(&links_path).unwrap();
    assert_eq!(
        written_links,
        "{\n  \"19339\": [\n    {\n      \"ABC123\": \"https://archive.test/Redump/Super Game (USA).zip\"\n    }\n  ]\n}"
    );
    let written_missing = std::fs::read_to_string(&missing_path).unwrap();
    assert_eq!(written_missing, "{\n  \"7\": {\n    \"FF\": \"x\"\n  }\n}");
}

#[test]
fn missing_document_keys_are_sorted_numerically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missinghashes.json");
    std::fs::write(&path, r#"{"100": {"A": "a"}, "9": {"B": "b"}, "0020": {"C": "c"}}"#).unwrap();

    let mut missing = load_missing(&path).unwrap();
    let mut batch = MissingHashes::new();
    batch.insert_if_absent(GameId(15), "D", "d");
    merge_missing(&mut missing, &batch);
    save_missing(&path, &missing).unwrap();

    let ids: Vec<u64> = missing.game_ids().map(|id| id.0).collect();
    assert_eq!(ids, vec![9, 15, 20, 100]);

    let text = std::fs::read_to_string(&path).unwrap();
    let positions: Vec<usize> = ["\"9\"", "\"15\"", "\"20\"", "\"100\""]
        .iter()
        .map(|k| text.find(k).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn new_hashes_join_the_first_object() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hashlinks.json");
    std::fs::write(
        &path,
        r#"{"5": [{"AA": "https://a"}, {"BB": "https://b"}]}"#,
    )
    .unwrap();

    let mut links = load_links(&path).unwrap();
    let stats = merge_links(&mut links, &batch_links(5, &[("BB", "https://new"), ("CC", "https://c")]));
    assert_eq!(stats, MergeStats { added: 1, existing: 1 });

    let groups = links.get(GameId(5)).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].get("CC").map(String::as_str), Some("https://c"));
    assert_eq!(links.url(GameId(5), "BB"), Some("https://b"));
}

fn backups_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("hashlinks.json.corrupt-"))
        .collect();
    names.sort();
    names
}

#[test]
fn corrupt_document_is_backed_up_and_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hashlinks.json");
    std::fs::write(&path, "{ not json").unwrap();

    let links = load_links(&path).unwrap();
    assert!(links.is_empty());

    let backups = backups_in(dir.path());
    assert_eq!(backups.len(), 1);
    assert_eq!(
        std::fs::read_to_string(dir.path().join(&backups[0])).unwrap(),
        "{ not json"
    );
}

#[test]
fn repeated_corruption_keeps_every_backup() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hashlinks.json");

    std::fs::write(&path, "{ first").unwrap();
    load_links(&path).unwrap();
    std::fs::write(&path, "{ second").unwrap();
    load_links(&path).unwrap();

    let contents: Vec<String> = backups_in(dir.path())
        .iter()
        .map(|name| std::fs::read_to_string(dir.path().join(name)).unwrap())
        .collect();
    assert_eq!(contents.len(), 2);
    assert!(contents.contains(&"{ first".to_string()));
    assert!(contents.contains(&"{ second".to_string()));
}

#[test]
fn corrupt_path_is_timestamped_and_unique() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hashlinks.json");
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();

    let first = corrupt_path(&path, now);
    assert_eq!(
        first,
        dir.path().join("hashlinks.json.corrupt-20261019T083000Z")
    );

    std::fs::write(&first, "old").unwrap();
    assert_eq!(
        corrupt_path(&path, now),
        dir.path().join("hashlinks.json.corrupt-20261019T083000Z-1")
    );
}

#[test]
fn atomic_save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("hashlinks.json");

    save_links(&path, &batch_links(1, &[("AA", "https://a")])).unwrap();

    let names: Vec<String> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["hashlinks.json"]);
}

#[test]
fn count_both_documents() {
    let dir = TempDir::new().unwrap();
    let links_path = dir.path().join("hashlinks.json");
    let missing_path = dir.path().join("missinghashes.json");
    std::fs::write(&links_path, r#"{"1": [{"A": "u", "B": "u"}, {"C": "u"}]}"#).unwrap();
    std::fs::write(&missing_path, r#"{"2": {"D": "d"}}"#).unwrap();

    assert_eq!(count_file(&links_path).unwrap(), 3);
    assert_eq!(count_file(&missing_path).unwrap(), 1);
    assert!(count_file(&dir.path().join("absent.json")).is_err());
}

#[test]
fn readme_block_is_rewritten_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("README.md");
    std::fs::write(
        &path,
        "Intro\n\n## 🔗 Linked Hash Status (as of Jan. 1, 2025)\n- **Linked Hashes:** 1\n- **Missing Hashes:** 2\n\nOutro\n",
    )
    .unwrap();

    let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    update_readme(&path, 12345, 678, now).unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Intro\n\n## 🔗 Linked Hash Status (as of Oct. 19, 2026)\n- **Linked Hashes:** 12,345\n- **Missing Hashes:** 678\n\nOutro\n"
    );
}

#[test]
fn readme_without_block_is_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("README.md");
    std::fs::write(&path, "# Nothing here\n").unwrap();

    let err = update_readme(&path, 1, 2, Utc::now()).unwrap_err();
    assert!(matches!(err, StoreError::ReadmeMarkerMissing(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Nothing here\n");
}
