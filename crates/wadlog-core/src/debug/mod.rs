//! Debug utilities for inspecting content containers
//!
//! Lists the lump directory of a WAD, or the entries of a zip wrapper, and
//! marks which ones are map-definition lumps.

use std::path::Path;

use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::archive::{ArchiveReader, ZIP_MAGIC, base_name, read_limited};
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::mapinfo::MapDefinitionKind;
use crate::wad::{WadFile, WadKind, is_wad};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
pub enum ContainerKind {
    #[strum(serialize = "IWAD")]
    Iwad,
    #[strum(serialize = "PWAD")]
    Pwad,
    #[strum(serialize = "zip")]
    Zip,
}

impl From<WadKind> for ContainerKind {
    fn from(kind: WadKind) -> Self {
        match kind {
            WadKind::Iwad => Self::Iwad,
            WadKind::Pwad => Self::Pwad,
        }
    }
}

/// One lump or archive entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LumpRow {
    pub name: String,
    /// Byte offset for WAD lumps; zip entries have none
    pub offset: Option<u32>,
    pub size: u64,
    #[serde(skip)]
    pub definition: Option<MapDefinitionKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerListing {
    pub kind: ContainerKind,
    pub rows: Vec<LumpRow>,
}

impl ContainerListing {
    pub fn from_path<P: AsRef<Path>>(path: P, limits: &Limits) -> Result<Self> {
        let data = read_limited(path.as_ref(), limits.max_archive_bytes)?;
        Self::from_bytes(data, limits)
    }

    pub fn from_bytes(data: Vec<u8>, limits: &Limits) -> Result<Self> {
        if is_wad(&data) {
            let wad = WadFile::parse(&data)?;
            let rows = wad
                .entries()
                .iter()
                .map(|entry| LumpRow {
                    definition: MapDefinitionKind::from_lump_name(&entry.name),
                    name: entry.name.clone(),
                    offset: Some(entry.offset),
                    size: u64::from(entry.size),
                })
                .collect();
            return Ok(Self {
                kind: wad.kind().into(),
                rows,
            });
        }

        if data.starts_with(&ZIP_MAGIC) {
            let mut archive = ArchiveReader::from_bytes(data, limits)?;
            let rows = archive
                .entry_sizes()?
                .into_iter()
                .map(|(name, size)| LumpRow {
                    definition: MapDefinitionKind::from_entry_name(base_name(&name)),
                    name,
                    offset: None,
                    size,
                })
                .collect();
            return Ok(Self {
                kind: ContainerKind::Zip,
                rows,
            });
        }

        Err(Error::Format(
            "content is neither a level container nor a zip archive".to_string(),
        ))
    }

    pub fn definitions(&self) -> impl Iterator<Item = &LumpRow> {
        self.rows.iter().filter(|row| row.definition.is_some())
    }
}
