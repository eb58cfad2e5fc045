//! Collaborator interfaces: the download ledger and the engine save directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Save-state archive extension written by the engine
pub const SAVE_EXTENSION: &str = "zds";

/// Maps content slugs to installed files
pub trait DownloadLedger: Send + Sync {
    /// Path of the installed file for a slug, if it is installed
    fn installed_file(&self, slug: &str) -> Option<PathBuf>;

    /// Every slug the ledger knows about
    fn slugs(&self) -> Vec<String>;
}

/// Lists save-state archives for a slug
pub trait SaveSource: Send + Sync {
    /// Candidate save files in processing order
    fn save_files(&self, slug: &str) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Clone, Deserialize)]
struct LedgerEntry {
    #[serde(rename = "fileName", alias = "file_name", alias = "file")]
    file_name: String,
}

/// Ledger backed by the launcher's `downloads.json`:
///
/// ```json
/// { "sunlust": { "fileName": "sunlust.wad" } }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonLedger {
    downloads_dir: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonLedger {
    /// Load the ledger. A missing file is an empty ledger.
    pub fn load<P: AsRef<Path>>(path: P, downloads_dir: impl Into<PathBuf>) -> Result<Self> {
        let path = path.as_ref();
        let downloads_dir = downloads_dir.into();

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No download ledger at {}", path.display());
                return Ok(Self {
                    downloads_dir,
                    entries: BTreeMap::new(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let raw: BTreeMap<String, LedgerEntry> =
            serde_json::from_str(&content).map_err(|e| Error::Validation {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            downloads_dir,
            entries: raw.into_iter().map(|(k, v)| (k, v.file_name)).collect(),
        })
    }

    /// Build a ledger from (slug, file name) pairs
    pub fn from_entries<I>(downloads_dir: impl Into<PathBuf>, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            downloads_dir: downloads_dir.into(),
            entries: entries.into_iter().collect(),
        }
    }
}

impl DownloadLedger for JsonLedger {
    fn installed_file(&self, slug: &str) -> Option<PathBuf> {
        self.entries
            .get(slug)
            .map(|file_name| self.downloads_dir.join(file_name))
    }

    fn slugs(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Save directory laid out as `<root>/<slug>/*.zds`
#[derive(Debug, Clone)]
pub struct SaveDir {
    root: PathBuf,
}

impl SaveDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn slug_dir(&self, slug: &str) -> PathBuf {
        self.root.join(slug)
    }
}

impl SaveSource for SaveDir {
    fn save_files(&self, slug: &str) -> Result<Vec<PathBuf>> {
        let dir = self.slug_dir(slug);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No save directory for {}", slug);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(SAVE_EXTENSION))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_ledger() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("downloads.json");
        fs::write(
            &path,
            r#"{"sunlust": {"fileName": "sunlust.wad", "sha256": "abc"}, "eviternity": {"file": "eviternity.zip"}}"#,
        )
        .unwrap();

        let ledger = JsonLedger::load(&path, dir.path().join("downloads")).unwrap();
        assert_eq!(ledger.slugs(), vec!["eviternity", "sunlust"]);
        assert_eq!(
            ledger.installed_file("sunlust"),
            Some(dir.path().join("downloads").join("sunlust.wad"))
        );
        assert_eq!(ledger.installed_file("missing"), None);
    }

    #[test]
    fn test_missing_ledger_is_empty() {
        let ledger = JsonLedger::load("/nonexistent/downloads.json", "/tmp").unwrap();
        assert!(ledger.slugs().is_empty());
    }

    #[test]
    fn test_invalid_ledger() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("downloads.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            JsonLedger::load(&path, dir.path()),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_save_dir_lists_sorted_saves() {
        let dir = TempDir::new().unwrap();
        let saves = SaveDir::new(dir.path());
        let slug_dir = saves.slug_dir("sunlust");
        fs::create_dir_all(&slug_dir).unwrap();
        fs::write(slug_dir.join("save02.zds"), b"").unwrap();
        fs::write(slug_dir.join("auto01.ZDS"), b"").unwrap();
        fs::write(slug_dir.join("notes.txt"), b"").unwrap();

        let files = saves.save_files("sunlust").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["auto01.ZDS", "save02.zds"]);
    }

    #[test]
    fn test_save_dir_missing_slug() {
        let dir = TempDir::new().unwrap();
        assert!(SaveDir::new(dir.path()).save_files("none").unwrap().is_empty());
    }
}
