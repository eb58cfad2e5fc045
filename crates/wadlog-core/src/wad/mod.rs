//! Level container (WAD) parsing.
//!
//! A WAD is a 12-byte header followed by raw lump data and a directory:
//!
//! - Header: 4-byte magic (`IWAD` or `PWAD`), LE u32 lump count, LE u32 directory offset
//! - Directory: `lump_count` records of LE u32 offset, LE u32 size, 8-byte name
//!
//! Names are NUL- or space-padded ASCII and compared case-insensitively.

pub mod layout;

use strum::{Display, IntoStaticStr};

use crate::error::{Error, Result};

use layout::{DIRECTORY_RECORD_SIZE, HEADER_SIZE, LUMP_NAME_SIZE};

/// The two container kinds distinguished by the header magic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum WadKind {
    /// Original game data
    #[strum(serialize = "IWAD")]
    Iwad,
    /// Patch data layered over an IWAD
    #[strum(serialize = "PWAD")]
    Pwad,
}

impl WadKind {
    pub fn from_magic(magic: &[u8]) -> Option<Self> {
        match magic {
            b"IWAD" => Some(Self::Iwad),
            b"PWAD" => Some(Self::Pwad),
            _ => None,
        }
    }
}

/// Check whether a buffer starts with a WAD magic tag
pub fn is_wad(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && WadKind::from_magic(&bytes[..4]).is_some()
}

/// One record of the lump directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumpEntry {
    /// Upper-cased name with padding removed
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

impl LumpEntry {
    fn from_record(record: &[u8]) -> Self {
        let offset = read_u32(record, 0);
        let size = read_u32(record, 4);
        let raw_name = &record[8..8 + LUMP_NAME_SIZE];
        let name = raw_name
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect::<String>()
            .trim_end()
            .to_ascii_uppercase();

        Self { name, offset, size }
    }

    /// Byte range of the lump data within the container
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.size as usize
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// A parsed container borrowing the buffer it was read from
#[derive(Debug)]
pub struct WadFile<'a> {
    kind: WadKind,
    entries: Vec<LumpEntry>,
    data: &'a [u8],
}

impl<'a> WadFile<'a> {
    /// Parse the header and directory of a container
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::Format(format!(
                "container is {} bytes, smaller than the {} byte header",
                data.len(),
                HEADER_SIZE
            )));
        }

        let kind = WadKind::from_magic(&data[0..4]).ok_or_else(|| {
            Error::Format(format!(
                "invalid container magic: {:?}",
                String::from_utf8_lossy(&data[0..4])
            ))
        })?;

        let lump_count = read_u32(data, layout::LUMP_COUNT) as usize;
        let dir_offset = read_u32(data, layout::DIRECTORY_OFFSET) as usize;

        let dir_end = lump_count
            .checked_mul(DIRECTORY_RECORD_SIZE)
            .and_then(|len| len.checked_add(dir_offset))
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                Error::Format(format!(
                    "directory of {} lumps at offset {} extends past end of {} byte container",
                    lump_count,
                    dir_offset,
                    data.len()
                ))
            })?;

        let mut entries = Vec::with_capacity(lump_count);
        for record in data[dir_offset..dir_end].chunks_exact(DIRECTORY_RECORD_SIZE) {
            let entry = LumpEntry::from_record(record);
            if entry.offset as u64 + entry.size as u64 > data.len() as u64 {
                return Err(Error::Format(format!(
                    "lump {} ({} bytes at offset {}) extends past end of container",
                    entry.name, entry.size, entry.offset
                )));
            }
            entries.push(entry);
        }

        Ok(Self {
            kind,
            entries,
            data,
        })
    }

    pub fn kind(&self) -> WadKind {
        self.kind
    }

    /// Directory entries in file order
    pub fn entries(&self) -> &[LumpEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw bytes of a lump
    pub fn lump_data(&self, entry: &LumpEntry) -> &'a [u8] {
        // Ranges were bounds-checked in parse()
        &self.data[entry.range()]
    }

    /// All lumps with the given name, in directory order
    pub fn find<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s LumpEntry> + 's {
        self.entries.iter().filter(move |e| e.is_named(name))
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::layout::{DIRECTORY_RECORD_SIZE, HEADER_SIZE, LUMP_NAME_SIZE};

    /// Assemble a WAD from (name, data) pairs with the directory at the end
    pub fn build_wad(magic: &[u8; 4], lumps: &[(&str, &[u8])]) -> Vec<u8> {
        let mut data = Vec::new();
        let mut directory = Vec::new();
        let mut offset = HEADER_SIZE;

        for (name, content) in lumps {
            data.extend_from_slice(content);
            directory.extend_from_slice(&(offset as u32).to_le_bytes());
            directory.extend_from_slice(&(content.len() as u32).to_le_bytes());
            let mut padded = [0u8; LUMP_NAME_SIZE];
            padded[..name.len()].copy_from_slice(name.as_bytes());
            directory.extend_from_slice(&padded);
            offset += content.len();
        }

        let mut wad = Vec::with_capacity(offset + lumps.len() * DIRECTORY_RECORD_SIZE);
        wad.extend_from_slice(magic);
        wad.extend_from_slice(&(lumps.len() as u32).to_le_bytes());
        wad.extend_from_slice(&(offset as u32).to_le_bytes());
        wad.extend_from_slice(&data);
        wad.extend_from_slice(&directory);
        wad
    }
}
