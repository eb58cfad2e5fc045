//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod best;
pub mod capture;
pub mod lumps;
pub mod names;
pub mod rescan;
pub mod sessions;

use std::sync::Arc;

use anyhow::{Context, Result};
use wadlog_core::{Config, JsonLedger, LevelNameResolver, SaveDir, SessionStore};

/// Long-lived core services shared by the commands
pub struct Services {
    pub resolver: Arc<LevelNameResolver>,
    pub store: Arc<SessionStore>,
}

impl Services {
    pub fn new(config: &Config) -> Result<Self> {
        let ledger_path = config.ledger_path();
        let ledger = JsonLedger::load(&ledger_path, &config.downloads_dir)
            .with_context(|| format!("Failed to load download ledger {}", ledger_path.display()))?;

        let resolver = Arc::new(LevelNameResolver::new(config, Arc::new(ledger)));
        let saves = Arc::new(SaveDir::new(&config.saves_dir));
        let store = Arc::new(SessionStore::new(Arc::clone(&resolver), saves));

        Ok(Self { resolver, store })
    }
}
