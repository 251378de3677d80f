use crate::error::ApiError;

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "RA_API_KEY";

/// Where the API key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the settings file.
    ConfigFile,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Pick the API key: environment first, then the settings file.
///
/// Blank values count as unset.
pub fn resolve_api_key(
    env_value: Option<String>,
    config_value: Option<&str>,
) -> (Option<String>, CredentialSource) {
    if let Some(key) = env_value.filter(|k| !k.trim().is_empty()) {
        return (Some(key.trim().to_string()), CredentialSource::EnvVar(API_KEY_ENV));
    }
    if let Some(key) = config_value.filter(|k| !k.trim().is_empty()) {
        return (Some(key.trim().to_string()), CredentialSource::ConfigFile);
    }
    (None, CredentialSource::Missing)
}

/// Load the API key from the process environment or `config_value`.
pub fn load_api_key(config_value: Option<&str>) -> Result<String, ApiError> {
    let (key, _) = resolve_api_key(std::env::var(API_KEY_ENV).ok(), config_value);
    key.ok_or_else(|| {
        ApiError::config(format!(
            "Missing API key. Set the {API_KEY_ENV} env var or add api_key to the config file"
        ))
    })
}

/// Describe the current key source without loading it.
pub fn api_key_source(config_value: Option<&str>) -> CredentialSource {
    resolve_api_key(std::env::var(API_KEY_ENV).ok(), config_value).1
}

/// Show only the first and last two characters of a key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 4))
}
