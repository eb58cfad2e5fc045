//! # wadlog-core
//!
//! Core library for the wadlog play tracker.
//!
//! This crate provides:
//! - WAD and zip container reading
//! - Level-name extraction from map-definition lumps (MAPINFO, ZMAPINFO,
//!   EMAPINFO, UMAPINFO, DEHACKED)
//! - Cached, persisted level-name resolution per content slug
//! - Capture of engine save states into deduplicated play sessions
//! - Best-per-level statistics over captured sessions
//!
//! ## Feature Flags
//!
//! - `debug-tools`: Enables container listing utilities for the CLI.

pub mod archive;
pub mod config;
#[cfg(feature = "debug-tools")]
pub mod debug;
pub mod error;
pub mod ledger;
mod lock;
pub mod mapinfo;
pub mod names;
pub mod session;
pub mod stats;
pub mod storage;
pub mod wad;

pub use archive::ArchiveReader;
pub use config::{Config, ConfigBuilder, Limits};
pub use error::{Error, Result};
pub use ledger::{DownloadLedger, JsonLedger, SaveDir, SaveSource};
pub use lock::SlugLocks;
pub use mapinfo::{MapDefinitionKind, decode_lump_text, parse_map_definition};
pub use names::{
    LevelNameMap, LevelNameResolver, canonical_id, names_from_archive, names_from_bytes,
    names_from_wad,
};
pub use session::{
    LevelPlayStats, PlaySession, SaveStateParser, SessionDraft, SessionFingerprint, SessionStore,
    SkillTier, parse_status_line,
};
pub use stats::{BestEntry, StatsAggregator, StatsSummary, format_tics};
pub use storage::StatsLayout;
pub use wad::{LumpEntry, WadFile, WadKind};

// Debug utilities (requires debug-tools feature)
#[cfg(feature = "debug-tools")]
pub use debug::{ContainerKind, ContainerListing, LumpRow};
