use std::fs;
use std::path::{Path, PathBuf};

use dictionary::{Dialect, Endpoints, Url, DEFAULT_DEBOUNCE, DEFAULT_MAX_CANDIDATES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub lookup: LookupConfig,
    pub audio: AudioConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub entries_url: String,
    pub suggestions_url: String,
    /// Language code inserted before the word in entry URLs.
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Suggestions tried when the exact word is unknown.
    pub max_candidates: usize,
    pub debounce_ms: u64,
    pub dialect: Dialect,
}

/// External programs used for pronunciation. `{url}`, `{word}` and
/// `{locale}` in arguments are substituted; without a placeholder the URL or
/// word is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub player: Vec<String>,
    pub speech: Vec<String>,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            entries_url: "https://api.dictionaryapi.dev/api/v2/entries".to_owned(),
            suggestions_url: "https://api.datamuse.com/sug".to_owned(),
            language: "en".to_owned(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            dialect: Dialect::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            player: vec![
                "mpv".to_owned(),
                "--no-video".to_owned(),
                "--really-quiet".to_owned(),
            ],
            speech: vec!["espeak-ng".to_owned(), "-v".to_owned(), "{locale}".to_owned()],
            locale: "en-US".to_owned(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://smart-dictionary.db".to_owned(),
        }
    }
}

impl Config {
    /// `<config dir>/smart-dictionary/config.toml`, or the current directory
    /// when the platform has no config dir.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("smart-dictionary").join("config.toml")
    }

    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    /// Unlike [`Config::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoints()?;

        if self.lookup.max_candidates == 0 {
            return Err(ConfigError::Validation {
                message: "lookup.max_candidates must be at least 1".to_string(),
            });
        }

        if self.storage.database_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "storage.database_url must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let entries = parse_url("api.entries_url", &self.api.entries_url)?;
        let suggestions = parse_url("api.suggestions_url", &self.api.suggestions_url)?;
        Endpoints::new(entries, suggestions, &self.api.language).map_err(|e| {
            ConfigError::Validation {
                message: e.to_string(),
            }
        })
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::Validation {
        message: format!("{field} '{value}' is not a valid URL: {e}"),
    })
}
