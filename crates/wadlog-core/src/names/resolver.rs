//! Level-name resolution with a memory cache and a persisted JSON tier.
//!
//! Lookup order for a slug:
//! 1. In-memory cache
//! 2. `level-names.json` in the slug's stats directory
//! 3. Recomputation from the installed content file
//!
//! A non-empty recomputed map is written through to both tiers. An empty
//! result is neither cached nor persisted, so a later call can retry once
//! the content is installed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::archive::read_limited;
use crate::config::{Config, Limits};
use crate::error::Result;
use crate::ledger::DownloadLedger;
use crate::lock::{SlugLocks, lock_unpoisoned};
use crate::names::LevelNameMap;
use crate::names::extract::names_from_bytes;
use crate::storage::StatsLayout;

/// Owns the per-slug name cache. Construct once and share.
pub struct LevelNameResolver {
    layout: StatsLayout,
    ledger: Arc<dyn DownloadLedger>,
    limits: Limits,
    cache: Mutex<HashMap<String, LevelNameMap>>,
    locks: SlugLocks,
}

impl LevelNameResolver {
    pub fn new(config: &Config, ledger: Arc<dyn DownloadLedger>) -> Self {
        Self::with_layout(StatsLayout::new(config.stats_dir()), ledger, config.limits)
    }

    pub fn with_layout(layout: StatsLayout, ledger: Arc<dyn DownloadLedger>, limits: Limits) -> Self {
        Self {
            layout,
            ledger,
            limits,
            cache: Mutex::new(HashMap::new()),
            locks: SlugLocks::new(),
        }
    }

    pub fn layout(&self) -> &StatsLayout {
        &self.layout
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub(crate) fn locks(&self) -> &SlugLocks {
        &self.locks
    }

    /// Resolve the level names for a slug.
    ///
    /// Returns `Ok(None)` when no tier produced a name. Fails only when a
    /// freshly computed map cannot be persisted.
    pub fn resolve(&self, slug: &str) -> Result<Option<LevelNameMap>> {
        let lock = self.locks.for_slug(slug);
        let _guard = lock_unpoisoned(&lock);
        self.resolve_locked(slug)
    }

    /// Drop every cached slug known to the ledger and resolve it again.
    ///
    /// Returns the number of slugs that produced at least one name.
    pub fn rescan(&self) -> usize {
        let slugs = self.ledger.slugs();
        let mut resolved = 0;

        for slug in &slugs {
            let lock = self.locks.for_slug(slug);
            let _guard = lock_unpoisoned(&lock);
            self.evict(slug);

            match self.resolve_locked(slug) {
                Ok(Some(names)) => {
                    debug!("Rescan {}: {} level names", slug, names.len());
                    resolved += 1;
                }
                Ok(None) => debug!("Rescan {}: no level names", slug),
                Err(e) => warn!("Rescan {} failed: {}", slug, e),
            }
        }

        info!("Rescanned {} slugs, {} with level names", slugs.len(), resolved);
        resolved
    }

    /// Recompute names from the installed file, keeping previously known
    /// names for ids the file does not declare.
    pub fn refresh(&self, slug: &str) -> Result<Option<LevelNameMap>> {
        let lock = self.locks.for_slug(slug);
        let _guard = lock_unpoisoned(&lock);

        let Some(mut names) = self.compute(slug) else {
            return self.resolve_locked(slug);
        };
        if let Some(previous) = self.resolve_locked(slug)? {
            names.merge(&previous);
        }
        self.store_locked(slug, &names)?;
        Ok(Some(names))
    }

    /// Remove a slug from the memory cache
    pub fn evict(&self, slug: &str) {
        lock_unpoisoned(&self.cache).remove(slug);
    }

    /// Resolution body; the caller holds the slug lock
    pub(crate) fn resolve_locked(&self, slug: &str) -> Result<Option<LevelNameMap>> {
        if let Some(names) = lock_unpoisoned(&self.cache).get(slug) {
            if !names.is_empty() {
                return Ok(Some(names.clone()));
            }
        }

        if let Some(names) = self.load_persisted(slug) {
            lock_unpoisoned(&self.cache).insert(slug.to_string(), names.clone());
            return Ok(Some(names));
        }

        match self.compute(slug) {
            Some(names) => {
                self.store_locked(slug, &names)?;
                Ok(Some(names))
            }
            None => Ok(None),
        }
    }

    /// Persist a map and update the cache; the caller holds the slug lock
    pub(crate) fn store_locked(&self, slug: &str, names: &LevelNameMap) -> Result<()> {
        let path = self.layout.level_names_path(slug);
        names.save_to_path(&path)?;
        debug!("Saved {} level names to {}", names.len(), path.display());
        lock_unpoisoned(&self.cache).insert(slug.to_string(), names.clone());
        Ok(())
    }

    fn load_persisted(&self, slug: &str) -> Option<LevelNameMap> {
        let path = self.layout.level_names_path(slug);
        match LevelNameMap::load_from_path(&path) {
            Ok(names) if !names.is_empty() => Some(names),
            Ok(_) => None,
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!("Ignoring persisted level names for {}: {}", slug, e);
                None
            }
        }
    }

    /// Names from the installed file; `None` if nothing could be extracted
    fn compute(&self, slug: &str) -> Option<LevelNameMap> {
        let Some(path) = self.ledger.installed_file(slug) else {
            debug!("{} is not in the download ledger", slug);
            return None;
        };

        let data = match read_limited(&path, self.limits.max_archive_bytes) {
            Ok(data) => data,
            Err(e) if e.is_not_found() => {
                debug!("Installed file for {} not present: {}", slug, path.display());
                return None;
            }
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                return None;
            }
        };

        match names_from_bytes(data, &self.limits) {
            Ok(names) if !names.is_empty() => {
                info!("Extracted {} level names for {}", names.len(), slug);
                Some(names)
            }
            Ok(_) => {
                debug!("No level names in {}", path.display());
                None
            }
            Err(e) => {
                warn!("Cannot extract level names from {}: {}", path.display(), e);
                None
            }
        }
    }
}
