//! On-disk layout for persisted stats.
//!
//! ```text
//! <stats_dir>/<slug>/level-names.json    level id -> display name
//! <stats_dir>/<slug>/<fingerprint>.json  one captured play session
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name of the persisted level-name map inside a slug directory
pub const LEVEL_NAMES_FILE: &str = "level-names.json";

/// Extension of persisted session files
pub const SESSION_EXTENSION: &str = "json";

/// Path helper for the stats directory tree
#[derive(Debug, Clone)]
pub struct StatsLayout {
    root: PathBuf,
}

impl StatsLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn slug_dir(&self, slug: &str) -> PathBuf {
        self.root.join(slug)
    }

    pub fn level_names_path(&self, slug: &str) -> PathBuf {
        self.slug_dir(slug).join(LEVEL_NAMES_FILE)
    }

    pub fn session_path(&self, slug: &str, fingerprint: &str) -> PathBuf {
        self.slug_dir(slug)
            .join(format!("{}.{}", fingerprint, SESSION_EXTENSION))
    }

    /// Persisted session files for a slug, sorted by file name.
    /// A missing slug directory yields an empty list.
    pub fn session_files(&self, slug: &str) -> Result<Vec<PathBuf>> {
        let dir = self.slug_dir(slug);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == SESSION_EXTENSION))
            .filter(|path| path.file_name().is_some_and(|name| name != LEVEL_NAMES_FILE))
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Write a file via a temporary sibling and rename it into place
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
