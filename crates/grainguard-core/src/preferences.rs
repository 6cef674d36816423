//! User preferences persisted between sessions.
//!
//! The on-disk format is a flat JSON object keyed by namespaced strings, so
//! the same file can carry keys this crate does not know about. Those are
//! preserved across [`PreferenceStore::save`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, CoreError};

pub const MAP_TOKEN_KEY: &str = "grainGuard_mapboxToken";
pub const LANGUAGE_KEY: &str = "grainGuard_language";

const TOKEN_PREFIX: &str = "pk.";
const TOKEN_PREVIEW_CHARS: usize = 15;

/// A public map access token. Only the `pk.` prefix is checked locally;
/// whether the provider accepts it is only known once a request is made.
#[derive(Clone, PartialEq, Eq)]
pub struct MapToken(String);

impl MapToken {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTokenFormat`] unless `raw` starts with `pk.`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.starts_with(TOKEN_PREFIX) {
            Ok(Self(raw.to_string()))
        } else {
            Err(CoreError::InvalidTokenFormat)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters followed by an ellipsis, safe to show on screen.
    #[must_use]
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(TOKEN_PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}

impl fmt::Debug for MapToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MapToken([redacted])")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Kn,
}

impl Language {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Kn => "kn",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en" => Ok(Language::En),
            "kn" => Ok(Language::Kn),
            other => Err(CoreError::UnknownLanguage(other.to_string())),
        }
    }
}

/// In-memory view of the persisted preferences. Loaded once at startup and
/// handed to the components that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    map_token: Option<MapToken>,
    pub language: Language,
}

impl Preferences {
    #[must_use]
    pub fn map_token(&self) -> Option<&MapToken> {
        self.map_token.as_ref()
    }

    /// Validate and store a token. An invalid token leaves the current one
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTokenFormat`] if `raw` fails the prefix check.
    pub fn set_map_token(&mut self, raw: &str) -> Result<(), CoreError> {
        let token = MapToken::parse(raw)?;
        self.map_token = Some(token);
        Ok(())
    }

    pub fn clear_map_token(&mut self) {
        self.map_token = None;
    }

    /// Whether a token that passes the local format check is present.
    #[must_use]
    pub fn has_valid_token(&self) -> bool {
        self.map_token.is_some()
    }
}

/// File-backed storage for [`Preferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read preferences from disk. A missing file yields defaults; values
    /// that no longer validate are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PreferencesIo`] if the file exists but cannot be
    /// read, or [`ConfigError::PreferencesParse`] if it is not a JSON object.
    pub fn load(&self) -> Result<Preferences, ConfigError> {
        let entries = self.read_entries()?;
        let mut prefs = Preferences::default();

        if let Some(raw) = entries.get(MAP_TOKEN_KEY).and_then(Value::as_str) {
            match MapToken::parse(raw) {
                Ok(token) => prefs.map_token = Some(token),
                Err(e) => tracing::warn!(key = MAP_TOKEN_KEY, error = %e, "ignoring stored token"),
            }
        }

        if let Some(raw) = entries.get(LANGUAGE_KEY).and_then(Value::as_str) {
            match raw.parse::<Language>() {
                Ok(language) => prefs.language = language,
                Err(e) => tracing::warn!(key = LANGUAGE_KEY, error = %e, "ignoring stored language"),
            }
        }

        Ok(prefs)
    }

    /// Write `prefs` to disk, keeping any unrelated keys already in the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PreferencesIo`] on read/write failure or
    /// [`ConfigError::PreferencesParse`] if the existing file is corrupt.
    pub fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        let mut entries = self.read_entries()?;

        match &prefs.map_token {
            Some(token) => {
                entries.insert(MAP_TOKEN_KEY.to_string(), Value::from(token.as_str()));
            }
            None => {
                entries.remove(MAP_TOKEN_KEY);
            }
        }
        entries.insert(LANGUAGE_KEY.to_string(), Value::from(prefs.language.code()));

        let body = serde_json::to_string_pretty(&entries).map_err(|e| self.parse_error(e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, body).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }

    fn read_entries(&self) -> Result<Map<String, Value>, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_str(&content).map_err(|e| self.parse_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::PreferencesIo {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn parse_error(&self, source: serde_json::Error) -> ConfigError {
        ConfigError::PreferencesParse {
            path: self.path.display().to_string(),
            source,
        }
    }
}
