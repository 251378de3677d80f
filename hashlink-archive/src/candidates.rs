//! Ordered candidate download URLs for a declared file.

use hashlink_core::{DumpGroup, filename};
use indexmap::IndexSet;

use crate::taxonomy::Taxonomy;

/// Where on the archive host things live.
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    /// Root of the archive, always ending in `/`
    pub root_url: String,
    /// Directory under the root holding the curated priority sets
    pub priority_dir: String,
    /// Prefix of each priority set directory, before the console alias
    pub priority_prefix: String,
    /// URLs outside these prefixes are never trusted as download links
    pub trusted_prefixes: Vec<String>,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self::new("https://myrient.erista.me/files/")
    }
}

impl ArchiveLayout {
    pub fn new(root_url: impl Into<String>) -> Self {
        let mut root_url = root_url.into();
        if !root_url.ends_with('/') {
            root_url.push('/');
        }
        Self {
            root_url,
            priority_dir: "RetroAchievements".to_string(),
            priority_prefix: "RA - ".to_string(),
            trusted_prefixes: vec![
                "https://myrient.erista.me/".to_string(),
                "https://archive.org/".to_string(),
            ],
        }
    }

    /// Base URL of the priority set for a console alias.
    pub fn priority_base(&self, alias: &str) -> String {
        format!(
            "{}{}/{}{}/",
            self.root_url,
            self.priority_dir.trim_matches('/'),
            self.priority_prefix,
            alias
        )
    }

    /// Base URL of one taxonomy folder of `group`.
    ///
    /// An empty folder is the group's base directory itself.
    pub fn folder_base(&self, group: DumpGroup, folder: &str) -> String {
        let folder = folder.trim_matches('/');
        let mut url = self.root_url.clone();
        for segment in [group.base_path().unwrap_or(""), folder] {
            if !segment.is_empty() {
                url.push_str(segment);
                url.push('/');
            }
        }
        url
    }

    pub fn is_trusted(&self, url: &str) -> bool {
        self.trusted_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }
}

/// The candidate list for one file, plus how it was derived.
#[derive(Debug, Clone, Default)]
pub struct CandidatePlan {
    /// Deduplicated URLs in probe order
    pub urls: Vec<String>,
    /// Number of leading URLs that point at the priority mirror
    pub priority_count: usize,
    /// The taxonomy had no entry and the raw console name was used as the folder
    pub console_fallback: bool,
}

/// Build the ordered, deduplicated candidate URLs for `declared_name`.
///
/// Priority mirror candidates come first when the console has an alias.
/// Then, folder by folder: each cleaned variant with `.zip`, each variant
/// bare, the raw name, and the raw name with `.zip`.
pub fn plan_candidates(
    taxonomy: &Taxonomy,
    layout: &ArchiveLayout,
    group: DumpGroup,
    console: &str,
    declared_name: &str,
) -> CandidatePlan {
    let variants = filename::name_variants(declared_name);
    let raw = filename::trim_leading_separator(declared_name.trim());
    let mut urls: IndexSet<String> = IndexSet::new();

    if let Some(alias) = taxonomy.priority_alias(console) {
        let base = layout.priority_base(alias);
        for variant in &variants {
            for ext in taxonomy.priority_extensions(console) {
                urls.insert(format!("{base}{variant}{ext}"));
            }
        }
    }
    let priority_count = urls.len();

    let (folders, console_fallback) = match taxonomy.folders_for(group, console) {
        Some(folders) => (folders.to_vec(), false),
        None => (vec![console.to_string()], true),
    };

    for folder in &folders {
        let base = layout.folder_base(group, folder);
        for variant in &variants {
            urls.insert(format!("{base}{variant}.zip"));
        }
        for variant in &variants {
            urls.insert(format!("{base}{variant}"));
        }
        if !raw.is_empty() {
            urls.insert(format!("{base}{raw}"));
            urls.insert(format!("{base}{raw}.zip"));
        }
    }

    CandidatePlan {
        urls: urls.into_iter().collect(),
        priority_count,
        console_fallback,
    }
}

#[cfg(test)]
#[path = "tests/candidates_tests.rs"]
mod tests;
