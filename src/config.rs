//! Persisted overlay settings
//!
//! A single JSON file under the user config directory:
//! `<config dir>/bigtree-overlay/config.json` (falls back to `~/.config`).
//! Reads never fail from the caller's point of view and writes are best-effort.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const APP_DIR: &str = "bigtree-overlay";
const CONFIG_FILE: &str = "config.json";

/// Endpoint used when neither the config file nor the CLI provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8443";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Settings shared between startup and the bridge commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    /// Sticky: the CLI can turn it on but never off.
    pub overlay: bool,
    pub always_on_top: bool,
    pub click_through: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            overlay: false,
            always_on_top: true,
            click_through: false,
        }
    }
}

impl Config {
    /// Base URL with the hardcoded fallback applied.
    pub fn effective_base_url(&self) -> &str {
        if self.base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            &self.base_url
        }
    }
}

/// Location of the config file plus load/save.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform location.
    pub fn locate() -> Self {
        Self::new(config_path(dirs::config_dir(), dirs::home_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file; missing, unreadable or malformed content all yield defaults.
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(config) => config,
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.path.display());
                Config::default()
            }
            Err(e) => {
                warn!("Ignoring unusable config: {}", e);
                Config::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Writes the file; failures are logged and dropped.
    pub fn save(&self, config: &Config) {
        match self.try_save(config) {
            Ok(()) => debug!("Config saved to {}", self.path.display()),
            Err(e) => warn!("Config not saved: {}", e),
        }
    }

    pub fn try_save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
        write_private(&self.path, content.as_bytes()).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// `<config dir>/bigtree-overlay/config.json`, falling back to `<home>/.config`
/// and, with neither known, to a path relative to the working directory.
fn config_path(config_dir: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    let base = config_dir
        .or_else(|| home.map(|home| home.join(".config")))
        .unwrap_or_else(|| {
            warn!("No config or home directory, using a relative config path");
            PathBuf::from(".config")
        });
    base.join(APP_DIR).join(CONFIG_FILE)
}

/// Owner read/write only on Unix.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
