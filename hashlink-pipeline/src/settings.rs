//! Settings file: paths, upstream API and archive options.
//!
//! Lives at `~/.config/hashlink/config.toml` unless a path is given. Every
//! field has a default, so a missing file or a partial file both work.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hashlink_archive::ArchiveLayout;
use hashlink_core::{ExclusionRules, GameId};
use serde::{Deserialize, Serialize};

use crate::batch::BatchOptions;
use crate::error::SettingsError;

/// Known cheat and test entries that are never processed.
pub const DEFAULT_EXCLUDED_GAME_IDS: [u64; 10] = [
    31888, 11618, 11622, 11620, 11623, 11624, 11619, 11625, 11621, 13106,
];

/// Canonical path to the settings file: `~/.config/hashlink/config.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("hashlink").join("config.toml")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overridden by the `RA_API_KEY` environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub links_path: PathBuf,
    pub missing_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_path: Option<PathBuf>,
    pub upstream: UpstreamSettings,
    pub archive: ArchiveSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            links_path: PathBuf::from("hashlinks.json"),
            missing_path: PathBuf::from("missinghashes.json"),
            readme_path: None,
            upstream: UpstreamSettings::default(),
            archive: ArchiveSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Pause after each game's metadata fetch
    pub game_delay_secs: u64,
    /// How far back the claim feeds are read
    pub activity_window_days: u32,
    pub excluded_game_ids: Vec<u64>,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: hashlink_ra::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            game_delay_secs: 10,
            activity_window_days: 8,
            excluded_game_ids: DEFAULT_EXCLUDED_GAME_IDS.to_vec(),
        }
    }
}

impl UpstreamSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn game_delay(&self) -> Duration {
        Duration::from_secs(self.game_delay_secs)
    }

    pub fn activity_window(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.activity_window_days))
    }

    pub fn excluded_ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.excluded_game_ids.iter().copied().map(GameId)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    pub root_url: String,
    pub priority_dir: String,
    pub priority_prefix: String,
    pub probe_timeout_secs: u64,
    pub trusted_prefixes: Vec<String>,
    /// Games on consoles whose name contains this are skipped; empty disables
    pub excluded_console_marker: String,
    /// Replacement for the built-in folder taxonomy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<PathBuf>,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        let layout = ArchiveLayout::default();
        Self {
            root_url: layout.root_url,
            priority_dir: layout.priority_dir,
            priority_prefix: layout.priority_prefix,
            probe_timeout_secs: 10,
            trusted_prefixes: layout.trusted_prefixes,
            excluded_console_marker: "Hubs".to_string(),
            taxonomy_path: None,
        }
    }
}

impl ArchiveSettings {
    pub fn layout(&self) -> ArchiveLayout {
        let mut layout = ArchiveLayout::new(self.root_url.clone());
        layout.priority_dir = self.priority_dir.clone();
        layout.priority_prefix = self.priority_prefix.clone();
        layout.trusted_prefixes = self.trusted_prefixes.clone();
        layout
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn exclusion_rules(&self) -> ExclusionRules {
        let marker = self.excluded_console_marker.trim();
        ExclusionRules {
            console_marker: (!marker.is_empty()).then(|| marker.to_string()),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(SettingsError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };
        toml::from_str(&contents).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Load from the CLI override if given, else the canonical path.
    ///
    /// Returns the settings with the path they were read from.
    pub fn resolve(cli_override: Option<&Path>) -> Result<(Self, PathBuf), SettingsError> {
        let path = cli_override
            .map(Path::to_path_buf)
            .unwrap_or_else(settings_path);
        let settings = Self::load(&path)?;
        Ok((settings, path))
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            excluded_ids: self.upstream.excluded_ids().collect(),
            game_delay: self.upstream.game_delay(),
            exclusion: self.archive.exclusion_rules(),
        }
    }

    /// The settings as pretty TOML, with the API key left out.
    pub fn to_display_toml(&self) -> String {
        let mut shown = self.clone();
        shown.api_key = None;
        toml::to_string_pretty(&shown).unwrap_or_default()
    }
}
