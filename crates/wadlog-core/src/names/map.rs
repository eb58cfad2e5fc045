use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::write_atomic;

/// Canonical form of a level id (`MAP01`, `E1M1`)
pub fn canonical_id(id: &str) -> String {
    id.trim().to_ascii_uppercase()
}

/// Level id to display name mapping for one content item.
///
/// Inserts never overwrite: the first name recorded for an id wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelNameMap {
    names: BTreeMap<String, String>,
}

/// Keys are canonicalised through `insert`, so hand-edited files with
/// lower-case ids cannot hold two entries for one level.
impl<'de> Deserialize<'de> for LevelNameMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl LevelNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name unless the id already has one. Returns true if inserted.
    pub fn insert(&mut self, id: &str, name: &str) -> bool {
        let id = canonical_id(id);
        let name = name.trim();
        if id.is_empty() || name.is_empty() || self.names.contains_key(&id) {
            return false;
        }
        self.names.insert(id, name.to_string());
        true
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(&canonical_id(id)).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(&canonical_id(id))
    }

    /// Merge another map into this one, keeping existing names.
    /// Returns the number of ids added.
    pub fn merge(&mut self, other: &LevelNameMap) -> usize {
        other
            .iter()
            .filter(|(id, name)| self.insert(id, name))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Load a persisted map.
    ///
    /// A missing file is returned as the IO error (check `is_not_found`);
    /// anything that is not a JSON object of strings is a validation error.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let map: LevelNameMap =
            serde_json::from_str(&content).map_err(|e| Error::Validation {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!("Loaded {} level names from {}", map.len(), path.display());
        Ok(map)
    }

    /// Persist the map as a JSON object
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(path.as_ref(), content.as_bytes())
    }
}

impl FromIterator<(String, String)> for LevelNameMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, name) in iter {
            map.insert(&id, &name);
        }
        map
    }
}
