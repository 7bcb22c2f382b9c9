//! The persisted light/dark theme and the durable preference store behind it.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use nutriform_types::ThemeMode;
use tracing::{debug, warn};

/// Key under which the theme mode is stored.
pub const THEME_KEY: &str = "theme";

/// Error type for preference stores.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("I/O error on preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed preference file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A durable string key/value store surviving across sessions.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-memory store, used in tests and as a fallback when no file is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file backed store: one flat object of string values.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/nutriform/preferences.json`, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nutriform").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| PreferenceError::Json {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let io_err = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };

        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&all).map_err(|source| PreferenceError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, content).map_err(io_err)
    }
}

/// The process-wide theme state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemePreference {
    mode: ThemeMode,
}

impl ThemePreference {
    pub fn new(mode: ThemeMode) -> Self {
        Self { mode }
    }

    /// Read the stored mode. Missing, unreadable or unknown values fall back to light.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let mode = match store.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
                warn!(%err, "ignoring stored theme");
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(err) => {
                warn!(%err, "could not read theme preference");
                ThemeMode::default()
            }
        };
        debug!(%mode, "theme loaded");
        Self { mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Icon shown on the toggle.
    pub fn icon(&self) -> &'static str {
        self.mode.icon()
    }

    /// Flip the mode, returning the new one.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Write the current mode to the store.
    pub fn persist(&self, store: &mut dyn PreferenceStore) -> Result<(), PreferenceError> {
        store.set(THEME_KEY, self.mode.as_str())
    }
}
