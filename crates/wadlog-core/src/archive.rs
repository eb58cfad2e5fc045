//! In-memory reader for zip-style containers (pk3 wrappers and save archives).

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::config::Limits;
use crate::error::{Error, Result};

/// Zip local file header magic
pub const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";

/// Read a whole file into memory, refusing anything over `limit` bytes.
pub fn read_limited(path: &Path, limit: u64) -> Result<Vec<u8>> {
    let size = fs::metadata(path)?.len();
    if size > limit {
        return Err(Error::TooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }
    Ok(fs::read(path)?)
}

/// A zip archive held fully in memory
pub struct ArchiveReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    max_entry_bytes: u64,
}

impl ArchiveReader {
    /// Open an archive from disk, honouring the configured size limits
    pub fn open<P: AsRef<Path>>(path: P, limits: &Limits) -> Result<Self> {
        let path = path.as_ref();
        let bytes = read_limited(path, limits.max_archive_bytes)?;
        debug!("Opened archive {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(bytes, limits)
    }

    /// Open an archive already read into memory
    pub fn from_bytes(bytes: Vec<u8>, limits: &Limits) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self {
            archive,
            max_entry_bytes: limits.max_entry_bytes,
        })
    }

    /// Names of all file entries, in archive order
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i))
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect()
    }

    /// (name, uncompressed size) of every file entry, without decompressing
    pub fn entry_sizes(&mut self) -> Result<Vec<(String, u64)>> {
        let mut sizes = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(i)?;
            if entry.is_dir() {
                continue;
            }
            sizes.push((entry.name().to_string(), entry.size()));
        }
        Ok(sizes)
    }

    /// Read an entry's bytes by full path. Returns `Ok(None)` if absent.
    pub fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(index) = self.archive.index_for_name(name) else {
            return Ok(None);
        };

        let mut entry = self.archive.by_index(index)?;
        if entry.size() > self.max_entry_bytes {
            return Err(Error::TooLarge {
                path: name.into(),
                size: entry.size(),
                limit: self.max_entry_bytes,
            });
        }

        let mut buffer = Vec::with_capacity(entry.size() as usize);
        entry
            .by_ref()
            .take(self.max_entry_bytes + 1)
            .read_to_end(&mut buffer)?;
        if buffer.len() as u64 > self.max_entry_bytes {
            return Err(Error::TooLarge {
                path: name.into(),
                size: buffer.len() as u64,
                limit: self.max_entry_bytes,
            });
        }
        Ok(Some(buffer))
    }
}

/// Last path component of an archive entry name
pub fn base_name(entry: &str) -> &str {
    entry.rsplit(['/', '\\']).next().unwrap_or(entry)
}


#[cfg(test)]
mod tests {
    use super::test_support::build_zip;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_and_read_entries() {
        let bytes = build_zip(&[("info.json", b"{}"), ("maps/MAPINFO", b"map MAP01 \"A\"")]);
        let mut reader = ArchiveReader::from_bytes(bytes, &Limits::default()).unwrap();

        assert_eq!(reader.entry_names(), vec!["info.json", "maps/MAPINFO"]);
        assert_eq!(reader.read("info.json").unwrap().unwrap(), b"{}");
        assert!(reader.read("missing.json").unwrap().is_none());

        let sizes = reader.entry_sizes().unwrap();
        assert_eq!(sizes[0], ("info.json".to_string(), 2));
        assert_eq!(sizes[1].1, b"map MAP01 \"A\"".len() as u64);
    }

    #[test]
    fn test_entry_limit() {
        let bytes = build_zip(&[("big.bin", &[0u8; 64])]);
        let limits = Limits {
            max_entry_bytes: 16,
            ..Limits::default()
        };
        let mut reader = ArchiveReader::from_bytes(bytes, &limits).unwrap();
        assert!(matches!(
            reader.read("big.bin"),
            Err(Error::TooLarge { limit: 16, .. })
        ));
    }

    #[test]
    fn test_archive_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("save.zds");
        fs::write(&path, build_zip(&[("a", b"0123456789")])).unwrap();

        let limits = Limits {
            max_archive_bytes: 8,
            ..Limits::default()
        };
        assert!(matches!(
            ArchiveReader::open(&path, &limits),
            Err(Error::TooLarge { .. })
        ));
    }

    #[test]
    fn test_corrupt_archive() {
        let result = ArchiveReader::from_bytes(b"not a zip".to_vec(), &Limits::default());
        assert!(matches!(result, Err(Error::Zip(_))));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("maps/sub/ZMAPINFO.txt"), "ZMAPINFO.txt");
        assert_eq!(base_name("MAPINFO"), "MAPINFO");
    }
}
