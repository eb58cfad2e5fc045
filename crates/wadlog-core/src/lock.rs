//! Per-slug serialization.
//!
//! Name resolution and capture both read-modify-write the same per-slug
//! level-name map, so only one of them may run for a slug at a time.
//! Different slugs never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Table of one mutex per content slug
#[derive(Debug, Default)]
pub struct SlugLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SlugLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `slug`, created on first use
    pub fn for_slug(&self, slug: &str) -> Arc<Mutex<()>> {
        let mut locks = lock_unpoisoned(&self.locks);
        locks
            .entry(slug.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
