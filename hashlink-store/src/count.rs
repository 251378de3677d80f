use std::path::Path;

use serde_json::Value;

use crate::error::StoreError;

/// Number of hash keys in either document shape.
///
/// A game's value may be a list of objects (links) or one object (missing);
/// keys of every object are counted.
pub fn count_hashes(doc: &Value) -> usize {
    let Some(games) = doc.as_object() else {
        return 0;
    };
    games
        .values()
        .map(|value| match value {
            Value::Array(groups) => groups
                .iter()
                .filter_map(Value::as_object)
                .map(|group| group.len())
                .sum(),
            Value::Object(hashes) => hashes.len(),
            _ => 0,
        })
        .sum()
}

/// Count the hash entries in the document at `path`.
pub fn count_file(path: &Path) -> Result<usize, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let doc: Value = serde_json::from_str(&contents).map_err(|e| StoreError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    let count = count_hashes(&doc);
    log::debug!("Counted {count} hash entries in {}", path.display());
    Ok(count)
}

/// Format with `,` thousands separators.
pub fn with_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
