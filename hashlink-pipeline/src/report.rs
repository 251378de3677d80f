use hashlink_store::MergeStats;

/// The end-of-run text printed to stdout, suitable as a commit message body.
///
/// `None` when nothing resolved this run.
pub fn summary_text(stats: &MergeStats) -> Option<String> {
    let total = stats.total();
    if total == 0 {
        return None;
    }
    let mut text = String::from("Update hashes\n\n");
    if stats.added > 0 {
        text.push_str(&format!("\nNew hashes added: {}\n", stats.added));
    }
    if stats.existing > 0 {
        text.push_str(&format!("\nHashes already existed: {}\n", stats.existing));
    }
    text.push_str(&format!("\nTotal successful this run: {total}\n"));
    Some(text)
}
