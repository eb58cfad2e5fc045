//! Level display names.
//!
//! - **Map**: `LevelNameMap`, the id → name mapping and its JSON persistence
//! - **Extraction**: reading names out of WADs and zip wrappers
//! - **Resolver**: cached, persisted per-slug resolution

pub mod extract;
mod map;
mod resolver;

pub use extract::{names_from_archive, names_from_bytes, names_from_wad};
pub use map::*;
pub use resolver::*;
