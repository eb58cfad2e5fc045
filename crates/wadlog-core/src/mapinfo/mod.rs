//! Map-definition lump parsing.
//!
//! Content declares level titles in one of several text lumps. Each lump
//! name selects a grammar:
//!
//! - `MAPINFO` / `ZMAPINFO`: block grammar, `map MAP01 "Entryway"`
//! - `EMAPINFO`: section grammar, `[MAP01]` then `levelname = Entryway`
//! - `UMAPINFO`: brace grammar, `MAP MAP01 { levelname = "Entryway" }`
//! - `DEHACKED`: `HUSTR_*` strings inside the `[STRINGS]` section
//!
//! Parsing never fails on malformed input; lines that do not fit the
//! grammar are skipped. Within one parse the first name seen for an id wins.

mod block;
mod brace;
mod dehacked;
mod section;

use std::borrow::Cow;

use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{Error, Result};
use crate::names::LevelNameMap;

/// Known map-definition lumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum MapDefinitionKind {
    ZMapInfo,
    UMapInfo,
    EMapInfo,
    MapInfo,
    Dehacked,
}

impl MapDefinitionKind {
    /// Order in which lumps of one container are consulted
    pub const PRIORITY: [Self; 5] = [
        Self::ZMapInfo,
        Self::UMapInfo,
        Self::EMapInfo,
        Self::MapInfo,
        Self::Dehacked,
    ];

    /// Match a lump name exactly (case-insensitive)
    pub fn from_lump_name(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }

    /// Match an archive entry's base name, allowing a `.txt` or `.lmp` extension
    pub fn from_entry_name(base_name: &str) -> Option<Self> {
        if let Some(kind) = Self::from_lump_name(base_name) {
            return Some(kind);
        }
        let (stem, ext) = base_name.rsplit_once('.')?;
        if ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("lmp") {
            Self::from_lump_name(stem)
        } else {
            None
        }
    }

    pub fn lump_name(&self) -> &'static str {
        self.into()
    }

    /// Parse lump text with this kind's grammar
    pub fn parse(&self, text: &str) -> LevelNameMap {
        let mut names = LevelNameMap::new();
        match self {
            Self::MapInfo | Self::ZMapInfo => block::parse(text, &mut names),
            Self::EMapInfo => section::parse(text, &mut names),
            Self::UMapInfo => brace::parse(text, &mut names),
            Self::Dehacked => dehacked::parse(text, &mut names),
        }
        names
    }
}

/// Parse a map-definition lump by name
pub fn parse_map_definition(lump_name: &str, text: &str) -> Result<LevelNameMap> {
    let kind = MapDefinitionKind::from_lump_name(lump_name)
        .ok_or_else(|| Error::UnsupportedLump(lump_name.to_string()))?;
    Ok(kind.parse(text))
}

/// Decode lump bytes as UTF-8, falling back to Windows-1252 for legacy lumps
pub fn decode_lump_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.trim_start_matches('\u{feff}')),
        Err(_) => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling(bytes)
            .0,
    }
}

/// Names that refer to a string table instead of holding a title
fn is_string_reference(name: &str) -> bool {
    name.starts_with('$') || name.to_ascii_uppercase().starts_with("HUSTR_")
}
