//! Configuration for storage locations and archive limits.
//!
//! The config is a small TOML file. Every field is optional; anything left
//! out falls back to the platform data directory:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/wadlog"
//! downloads_dir = "/home/me/.local/share/wadlog/downloads"
//! saves_dir = "/home/me/.config/gzdoom/savegames"
//!
//! [limits]
//! max_archive_bytes = 268435456
//! max_entry_bytes = 67108864
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Directory name used under the platform data directory
const APP_DIR: &str = "wadlog";

/// Default cap for a whole archive read into memory (256 MiB)
pub const DEFAULT_MAX_ARCHIVE_BYTES: u64 = 256 * 1024 * 1024;

/// Default cap for a single decompressed archive entry (64 MiB)
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 64 * 1024 * 1024;

/// Size limits applied before anything is read into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_archive_bytes: u64,
    pub max_entry_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_archive_bytes: DEFAULT_MAX_ARCHIVE_BYTES,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

/// Configuration for the capture and resolution core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root for persisted level-name maps and sessions
    pub data_dir: PathBuf,
    /// Directory holding installed content files
    pub downloads_dir: PathBuf,
    /// Engine save directory, one sub-directory per content slug
    pub saves_dir: PathBuf,
    /// Download ledger file; `<data_dir>/downloads.json` when unset
    pub ledger_file: Option<PathBuf>,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(APP_DIR));

        Self {
            downloads_dir: data_dir.join("downloads"),
            saves_dir: data_dir.join("saves"),
            data_dir,
            ledger_file: None,
            limits: Limits::default(),
        }
    }
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config as TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding per-slug stats (names and sessions)
    pub fn stats_dir(&self) -> PathBuf {
        self.data_dir.join("stats")
    }

    /// Path of the download ledger
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("downloads.json"))
    }
}

/// Builder for Config
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    downloads_dir: Option<PathBuf>,
    saves_dir: Option<PathBuf>,
    ledger_file: Option<PathBuf>,
    limits: Option<Limits>,
}

impl ConfigBuilder {
    /// Set the data directory. Downloads and saves default to sub-directories of it.
    pub fn data_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    pub fn downloads_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.downloads_dir = Some(path.into());
        self
    }

    pub fn saves_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.saves_dir = Some(path.into());
        self
    }

    pub fn ledger_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ledger_file = Some(path.into());
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        let default = Config::default();
        let data_dir = self.data_dir.unwrap_or(default.data_dir);
        Config {
            downloads_dir: self
                .downloads_dir
                .unwrap_or_else(|| data_dir.join("downloads")),
            saves_dir: self.saves_dir.unwrap_or_else(|| data_dir.join("saves")),
            data_dir,
            ledger_file: self.ledger_file,
            limits: self.limits.unwrap_or_default(),
        }
    }
}
