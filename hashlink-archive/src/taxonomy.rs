//! Archive folder taxonomy: which folders each dump group keeps a console in.
//!
//! The table is data, not code. A copy is compiled in from
//! `data/archives.yaml` and an edited file can replace it at startup.

use std::collections::BTreeMap;
use std::path::Path;

use hashlink_core::DumpGroup;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::TaxonomyError;

const BUILTIN_YAML: &str = include_str!("../data/archives.yaml");
const BUILTIN_ORIGIN: &str = "<built-in archives.yaml>";

/// One folder or an ordered list of folders to try.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FolderSpec {
    One(String),
    Many(Vec<String>),
}

impl FolderSpec {
    pub fn folders(&self) -> &[String] {
        match self {
            Self::One(folder) => std::slice::from_ref(folder),
            Self::Many(folders) => folders,
        }
    }
}

/// Curated per-console sets tried before any dump-group folder.
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityMirror {
    #[serde(default = "default_extensions")]
    pub default_extensions: Vec<String>,
    /// Console name -> directory alias on the mirror
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
    /// Console name -> suffixes to probe instead of the defaults
    #[serde(default)]
    pub extensions: IndexMap<String, Vec<String>>,
}

fn default_extensions() -> Vec<String> {
    vec![".zip".to_string()]
}

impl Default for PriorityMirror {
    fn default() -> Self {
        Self {
            default_extensions: default_extensions(),
            aliases: IndexMap::new(),
            extensions: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Taxonomy {
    #[serde(default)]
    folders: BTreeMap<DumpGroup, IndexMap<String, FolderSpec>>,
    #[serde(default)]
    priority_mirror: PriorityMirror,
}

impl Taxonomy {
    /// The table shipped with the binary.
    pub fn builtin() -> Result<Self, TaxonomyError> {
        Self::from_yaml(BUILTIN_YAML, BUILTIN_ORIGIN)
    }

    /// Load a replacement table from disk.
    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let contents = std::fs::read_to_string(path).map_err(|e| TaxonomyError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&contents, &path.display().to_string())
    }

    /// Use `path` when given, the built-in table otherwise.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, TaxonomyError> {
        match path {
            Some(path) => {
                log::info!("Loading archive taxonomy from {}", path.display());
                Self::load(path)
            }
            None => Self::builtin(),
        }
    }

    pub fn from_yaml(contents: &str, origin: &str) -> Result<Self, TaxonomyError> {
        serde_yml::from_str(contents).map_err(|e| TaxonomyError::Parse {
            path: origin.to_string(),
            source: e,
        })
    }

    /// Folders for `console` under `group`, or `None` when the table has no entry.
    pub fn folders_for(&self, group: DumpGroup, console: &str) -> Option<&[String]> {
        self.folders
            .get(&group)
            .and_then(|consoles| consoles.get(console))
            .map(FolderSpec::folders)
    }

    /// Number of console entries listed for `group`.
    pub fn console_count(&self, group: DumpGroup) -> usize {
        self.folders.get(&group).map_or(0, IndexMap::len)
    }

    pub fn priority_alias(&self, console: &str) -> Option<&str> {
        self.priority_mirror.aliases.get(console).map(String::as_str)
    }

    /// Suffixes to probe on the priority mirror for `console`.
    pub fn priority_extensions(&self, console: &str) -> &[String] {
        self.priority_mirror
            .extensions
            .get(console)
            .unwrap_or(&self.priority_mirror.default_extensions)
    }
}
