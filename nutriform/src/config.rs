//! Client configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::theme::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};

pub const CONFIG_ENV: &str = "NUTRIFORM_CONFIG";
pub const BASE_URL_ENV: &str = "NUTRIFORM_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// File name used when saving a downloaded report.
pub const REPORT_FILE_NAME: &str = "nutrient_recommendations.pdf";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the recommendation server.
    pub base_url: String,
    pub toast_duration_ms: u64,
    /// Where the theme preference is kept. Defaults to the user config dir.
    pub preferences_path: Option<PathBuf>,
    /// Where downloaded reports are written. Defaults to the user download dir.
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            toast_duration_ms: crate::notify::DEFAULT_TOAST_DURATION.as_millis() as u64,
            preferences_path: None,
            download_dir: None,
        }
    }
}

impl ClientConfig {
    /// Resolve the config path and load it, then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match resolve_config_path(explicit, env_path) {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.override_base_url(std::env::var(BASE_URL_ENV).ok());
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace the base URL when `url` is present and non-blank.
    pub fn override_base_url(&mut self, url: Option<String>) {
        if let Some(url) = url
            && !url.trim().is_empty()
        {
            self.base_url = url;
        }
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.preferences_path
            .clone()
            .or_else(FilePreferenceStore::default_path)
    }

    /// The theme store for this client; in-memory when no path is known.
    pub fn preference_store(&self) -> Box<dyn PreferenceStore> {
        match self.preferences_path() {
            Some(path) => Box::new(FilePreferenceStore::new(path)),
            None => Box::new(MemoryPreferenceStore::new()),
        }
    }

    /// Full path a downloaded report is saved to.
    pub fn report_path(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(REPORT_FILE_NAME)
    }
}

/// Resolve the config file path:
/// 1. Explicit path
/// 2. `NUTRIFORM_CONFIG` (passed in as `env_path`)
/// 3. `<config dir>/nutriform/config.toml`
pub fn resolve_config_path(explicit: Option<&Path>, env_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_path {
        return Some(path);
    }
    dirs::config_dir().map(|dir| dir.join("nutriform").join("config.toml"))
}
