//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for run settings.
//! Settings are stored in TOML format in the platform-specific config directory.
//! Command-line flags override anything loaded here.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::memory::MemoryLayout;
use crate::replay::RecordingMode;

/// Configuration file name inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Errors from loading or saving an explicit config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration.
///
/// Every section falls back to its defaults when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Frame loop settings
    #[serde(default)]
    pub run: RunConfig,
    /// Address space of the emulated console
    #[serde(default)]
    pub memory: MemoryLayout,
    /// Output locations
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Frame loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Frame budget (default: 600, ten seconds at 60 Hz)
    #[serde(default = "default_frames")]
    pub frames: u64,
    /// Snapshot every N frames, 0 to disable (default: 0)
    #[serde(default)]
    pub snapshot_interval: u64,
    /// Recording mode (default: basic)
    #[serde(default)]
    pub mode: RecordingMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Snapshot output directory (default: `snapshots`)
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

fn default_frames() -> u64 {
    600
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            snapshot_interval: 0,
            mode: RecordingMode::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Padtape\config`
/// On macOS: `~/Library/Application Support/io.padtape.Padtape`
/// On Linux: `~/.config/Padtape`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.padtape", "", "Padtape")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from the platform config directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE)) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("{err}; using defaults");
            Config::default()
        }
    }
}

/// Loads the configuration from an explicit file.
///
/// # Errors
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the configuration to the platform config directory.
///
/// Does nothing if the home directory cannot be determined.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    match config_dir() {
        Some(dir) => save_to(config, &dir.join(CONFIG_FILE)),
        None => Ok(()),
    }
}

/// Saves the configuration to an explicit file, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
