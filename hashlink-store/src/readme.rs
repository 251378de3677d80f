//! The linked-hash status block in the project README.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::count::with_thousands;
use crate::document::write_atomic;
use crate::error::StoreError;

const HEADING: &str = "## 🔗 Linked Hash Status (as of ";
const LINKED_LINE: &str = "- **Linked Hashes:** ";
const MISSING_LINE: &str = "- **Missing Hashes:** ";

/// `Oct. 19, 2026` style date, in UTC.
pub fn status_date(now: DateTime<Utc>) -> String {
    now.format("%b. %-d, %Y").to_string()
}

pub fn status_block(linked: usize, missing: usize, now: DateTime<Utc>) -> String {
    format!(
        "{HEADING}{})\n{LINKED_LINE}{}\n{MISSING_LINE}{}",
        status_date(now),
        with_thousands(linked),
        with_thousands(missing)
    )
}

/// Byte range of the existing status block, if the text has one.
fn find_block(text: &str) -> Option<std::ops::Range<usize>> {
    let start = text.find(HEADING)?;
    let mut pos = start + HEADING.len();

    let close = text[pos..].find(')')?;
    if text[pos..pos + close].contains('\n') {
        return None;
    }
    pos += close + 1;

    for label in [LINKED_LINE, MISSING_LINE] {
        pos += whitespace_len(&text[pos..]);
        if !text[pos..].starts_with(label) {
            return None;
        }
        pos += label.len();
        let digits = text[pos..]
            .find(|c: char| !(c.is_ascii_digit() || c == ','))
            .unwrap_or(text.len() - pos);
        if digits == 0 {
            return None;
        }
        pos += digits;
    }
    Some(start..pos)
}

fn whitespace_len(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// Replace the status block in `text`, or `None` when there is no block.
pub fn replace_block(text: &str, block: &str) -> Option<String> {
    let range = find_block(text)?;
    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..range.start]);
    out.push_str(block);
    out.push_str(&text[range.end..]);
    Some(out)
}

/// Rewrite the status block of the README at `path`.
pub fn update_readme(
    path: &Path,
    linked: usize,
    missing: usize,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let block = status_block(linked, missing, now);
    let updated = replace_block(&text, &block)
        .ok_or_else(|| StoreError::ReadmeMarkerMissing(path.display().to_string()))?;
    if updated != text {
        write_atomic(path, updated.as_bytes())?;
    }
    log::info!("Updated hash status in {}", path.display());
    Ok(())
}
