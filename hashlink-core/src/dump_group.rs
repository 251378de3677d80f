/// Cataloguing convention a declared file belongs to.
///
/// The group decides which archive taxonomy table and base path are used to
/// guess a download URL. It is derived from the file's labels through the
/// ordered [`GROUP_RULES`] table and never persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum DumpGroup {
    /// Carries both `nointro` and `redump` labels (non-Redump disc sets)
    #[serde(rename = "Non-Redump")]
    NonRedump,
    #[serde(rename = "No-Intro")]
    NoIntro,
    #[serde(rename = "Redump")]
    Redump,
    #[serde(rename = "fbneo")]
    FbNeo,
    #[serde(rename = "wozaday")]
    WozADay,
    #[serde(rename = "4amcrack")]
    FourAmCrack,
    #[serde(rename = "cleancpc")]
    CleanCpc,
    #[serde(rename = "neokobe")]
    NeoKobe,
    #[serde(rename = "lostlevel")]
    LostLevel,
    #[serde(rename = "rapatches")]
    RaPatches,
    #[serde(rename = "mamesl")]
    MameSl,
    #[serde(rename = "tosec")]
    Tosec,
    #[serde(rename = "goodtools")]
    GoodTools,
    #[serde(rename = "nongood")]
    NonGood,
}

const ALL_GROUPS: &[DumpGroup] = &[
    DumpGroup::NonRedump,
    DumpGroup::NoIntro,
    DumpGroup::Redump,
    DumpGroup::FbNeo,
    DumpGroup::WozADay,
    DumpGroup::FourAmCrack,
    DumpGroup::CleanCpc,
    DumpGroup::NeoKobe,
    DumpGroup::LostLevel,
    DumpGroup::RaPatches,
    DumpGroup::MameSl,
    DumpGroup::Tosec,
    DumpGroup::GoodTools,
    DumpGroup::NonGood,
];

impl DumpGroup {
    /// Stable name, also used as the key in the taxonomy asset.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NonRedump => "Non-Redump",
            Self::NoIntro => "No-Intro",
            Self::Redump => "Redump",
            Self::FbNeo => "fbneo",
            Self::WozADay => "wozaday",
            Self::FourAmCrack => "4amcrack",
            Self::CleanCpc => "cleancpc",
            Self::NeoKobe => "neokobe",
            Self::LostLevel => "lostlevel",
            Self::RaPatches => "rapatches",
            Self::MameSl => "mamesl",
            Self::Tosec => "tosec",
            Self::GoodTools => "goodtools",
            Self::NonGood => "nongood",
        }
    }

    /// Path segment under the archive root that this group's folders live in.
    ///
    /// `None` means the taxonomy folder is used verbatim under the root.
    pub fn base_path(&self) -> Option<&'static str> {
        match self {
            Self::NoIntro | Self::NonRedump => Some("No-Intro"),
            Self::Redump => Some("Redump"),
            Self::FbNeo => Some("FinalBurn Neo"),
            Self::LostLevel => Some("Lost Level"),
            Self::Tosec => None,
            other => Some(other.name()),
        }
    }

    /// All groups, in rule order.
    pub fn all() -> &'static [DumpGroup] {
        ALL_GROUPS
    }
}

impl std::fmt::Display for DumpGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a string is not a known dump group name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown dump group: '{0}'")]
pub struct DumpGroupParseError(pub String);

impl std::str::FromStr for DumpGroup {
    type Err = DumpGroupParseError;

    /// Parse a group from its stable name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_GROUPS
            .iter()
            .copied()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DumpGroupParseError(s.to_string()))
    }
}

/// One row of the classification table: every label in `labels` must be
/// present for `group` to match.
#[derive(Debug, Clone, Copy)]
pub struct GroupRule {
    pub labels: &'static [&'static str],
    pub group: DumpGroup,
}

/// Classification rules, highest priority first. The combined
/// `nointro`+`redump` rule must stay ahead of both singular rules.
pub static GROUP_RULES: &[GroupRule] = &[
    GroupRule { labels: &["nointro", "redump"], group: DumpGroup::NonRedump },
    GroupRule { labels: &["nointro"], group: DumpGroup::NoIntro },
    GroupRule { labels: &["redump"], group: DumpGroup::Redump },
    GroupRule { labels: &["fbneo"], group: DumpGroup::FbNeo },
    GroupRule { labels: &["wozaday"], group: DumpGroup::WozADay },
    GroupRule { labels: &["4amcrack"], group: DumpGroup::FourAmCrack },
    GroupRule { labels: &["cleancpc"], group: DumpGroup::CleanCpc },
    GroupRule { labels: &["neokobe"], group: DumpGroup::NeoKobe },
    GroupRule { labels: &["lostlevel"], group: DumpGroup::LostLevel },
    GroupRule { labels: &["rapatches"], group: DumpGroup::RaPatches },
    GroupRule { labels: &["mamesl"], group: DumpGroup::MameSl },
    GroupRule { labels: &["tosec"], group: DumpGroup::Tosec },
    GroupRule { labels: &["goodtools"], group: DumpGroup::GoodTools },
    GroupRule { labels: &["nongood"], group: DumpGroup::NonGood },
];

/// Labels that exclude an entry outright.
pub const EXCLUDED_LABELS: &[&str] = &["legacy", "elf"];

/// Bracket annotations in a declared name that exclude an entry outright.
pub const EXCLUDED_NAME_MARKERS: &[&str] = &["[legacy]", "[elf]"];

/// Return the group of the first rule whose labels are all present.
pub fn match_rules(rules: &[GroupRule], labels: &[String]) -> Option<DumpGroup> {
    rules
        .iter()
        .find(|rule| {
            rule.labels
                .iter()
                .all(|required| labels.iter().any(|l| l == required))
        })
        .map(|rule| rule.group)
}

/// Classify a label set with the built-in rule table.
pub fn classify_labels(labels: &[String]) -> Option<DumpGroup> {
    match_rules(GROUP_RULES, labels)
}

/// Per-run exclusion settings that do not depend on the entry itself.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    /// Consoles whose name contains this marker are skipped entirely
    pub console_marker: Option<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            console_marker: Some("Hubs".to_string()),
        }
    }
}

/// Why an entry was rejected before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    EmptyName,
    NameMarker(&'static str),
    Label(&'static str),
    Console(String),
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "empty file name"),
            Self::NameMarker(m) => write!(f, "name contains {m}"),
            Self::Label(l) => write!(f, "labelled '{l}'"),
            Self::Console(c) => write!(f, "console '{c}' is excluded"),
        }
    }
}

/// Check the pre-filter for an entry of a game on `console_name`.
pub fn exclusion(
    entry: &crate::HashEntry,
    console_name: &str,
    rules: &ExclusionRules,
) -> Option<Exclusion> {
    if entry.declared_name.trim().is_empty() {
        return Some(Exclusion::EmptyName);
    }
    if let Some(marker) = EXCLUDED_NAME_MARKERS
        .iter()
        .find(|m| entry.declared_name.contains(**m))
    {
        return Some(Exclusion::NameMarker(marker));
    }
    if let Some(label) = EXCLUDED_LABELS.iter().find(|l| entry.has_label(l)) {
        return Some(Exclusion::Label(label));
    }
    if let Some(ref marker) = rules.console_marker
        && !marker.is_empty()
        && console_name.contains(marker.as_str())
    {
        return Some(Exclusion::Console(console_name.to_string()));
    }
    None
}

/// Classify an entry, or `None` when it is excluded or no rule matches.
///
/// `None` entries are dropped silently; they are never recorded as missing.
pub fn classify(
    entry: &crate::HashEntry,
    console_name: &str,
    rules: &ExclusionRules,
) -> Option<DumpGroup> {
    if exclusion(entry, console_name, rules).is_some() {
        return None;
    }
    classify_labels(&entry.labels)
}

#[cfg(test)]
#[path = "tests/dump_group_tests.rs"]
mod tests;
