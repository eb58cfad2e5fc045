//! Level-name extraction from installed content files.

use tracing::{debug, warn};

use crate::archive::{ArchiveReader, ZIP_MAGIC, base_name};
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::mapinfo::{MapDefinitionKind, decode_lump_text};
use crate::names::LevelNameMap;
use crate::wad::layout::WAD_EXTENSION;
use crate::wad::{WadFile, is_wad};

/// Names declared by the map-definition lumps of one level container.
///
/// Lumps are consulted in `MapDefinitionKind::PRIORITY` order, repeated
/// lumps in directory order. The first name for an id wins.
pub fn names_from_wad(data: &[u8]) -> Result<LevelNameMap> {
    let wad = WadFile::parse(data)?;
    let mut names = LevelNameMap::new();

    for kind in MapDefinitionKind::PRIORITY {
        for entry in wad.find(kind.lump_name()) {
            let text = decode_lump_text(wad.lump_data(entry));
            let found = kind.parse(&text);
            debug!("{} lump: {} level names", kind, found.len());
            names.merge(&found);
        }
    }

    Ok(names)
}

/// Names from a zip wrapper (pk3 and friends).
///
/// Nested level containers are scanned first, then loose map-definition
/// entries. A nested container that fails to parse is skipped.
pub fn names_from_archive(archive: &mut ArchiveReader) -> Result<LevelNameMap> {
    let entries = archive.entry_names();
    let mut names = LevelNameMap::new();

    for entry in entries.iter().filter(|e| is_wad_entry(e)) {
        let Some(data) = read_entry(archive, entry) else {
            continue;
        };
        match names_from_wad(&data) {
            Ok(found) => {
                debug!("Nested container {}: {} level names", entry, found.len());
                names.merge(&found);
            }
            Err(e) => warn!("Skipping nested container {}: {}", entry, e),
        }
    }

    for entry in &entries {
        let Some(kind) = MapDefinitionKind::from_entry_name(base_name(entry)) else {
            continue;
        };
        let Some(data) = read_entry(archive, entry) else {
            continue;
        };
        let found = kind.parse(&decode_lump_text(&data));
        debug!("Entry {} ({}): {} level names", entry, kind, found.len());
        names.merge(&found);
    }

    Ok(names)
}

/// Names from an installed file, detecting the container kind from its magic bytes
pub fn names_from_bytes(data: Vec<u8>, limits: &Limits) -> Result<LevelNameMap> {
    if is_wad(&data) {
        names_from_wad(&data)
    } else if data.starts_with(&ZIP_MAGIC) {
        let mut archive = ArchiveReader::from_bytes(data, limits)?;
        names_from_archive(&mut archive)
    } else {
        Err(Error::Format(
            "content is neither a level container nor a zip archive".to_string(),
        ))
    }
}

fn is_wad_entry(entry: &str) -> bool {
    entry
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(WAD_EXTENSION))
}

fn read_entry(archive: &mut ArchiveReader, entry: &str) -> Option<Vec<u8>> {
    match archive.read(entry) {
        Ok(data) => data,
        Err(e) => {
            warn!("Skipping archive entry {}: {}", entry, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::build_zip;
    use crate::wad::test_support::build_wad;

    #[test]
    fn test_wad_lump_priority() {
        let wad = build_wad(
            b"PWAD",
            &[
                ("MAPINFO", b"map MAP01 \"From Mapinfo\"\nmap MAP02 \"Only Mapinfo\""),
                ("ZMAPINFO", b"map MAP01 \"From Zmapinfo\""),
                ("THINGS", b"\x00\x01"),
            ],
        );
        let names = names_from_wad(&wad).unwrap();
        assert_eq!(names.get("MAP01"), Some("From Zmapinfo"));
        assert_eq!(names.get("MAP02"), Some("Only Mapinfo"));
    }

    #[test]
    fn test_wad_without_definitions() {
        let wad = build_wad(b"IWAD", &[("MAP01", b""), ("THINGS", b"")]);
        assert!(names_from_wad(&wad).unwrap().is_empty());
    }

    #[test]
    fn test_archive_nested_before_direct() {
        let nested = build_wad(b"PWAD", &[("UMAPINFO", b"MAP MAP01 { levelname = \"Nested\" }")]);
        // The loose lump comes first in the archive but nested containers win
        let zip = build_zip(&[
            ("mapinfo.txt", b"map MAP01 \"Direct\"\nmap MAP02 \"Direct Two\""),
            ("maps/levels.WAD", &nested),
        ]);
        let mut archive = ArchiveReader::from_bytes(zip, &Limits::default()).unwrap();
        let names = names_from_archive(&mut archive).unwrap();

        assert_eq!(names.get("MAP01"), Some("Nested"));
        assert_eq!(names.get("MAP02"), Some("Direct Two"));
    }

    #[test]
    fn test_archive_skips_corrupt_nested() {
        let zip = build_zip(&[
            ("broken.wad", b"PWAD\xff\xff\xff\xff\x00\x00\x00\x00"),
            ("EMAPINFO", b"[MAP01]\nlevelname = MAP01: Entryway"),
            ("readme.txt", b"map MAP09 \"Not A Lump\""),
        ]);
        let mut archive = ArchiveReader::from_bytes(zip, &Limits::default()).unwrap();
        let names = names_from_archive(&mut archive).unwrap();

        assert_eq!(names.get("MAP01"), Some("Entryway"));
        assert!(!names.contains("MAP09"));
    }

    #[test]
    fn test_names_from_bytes_detects_kind() {
        let wad = build_wad(b"PWAD", &[("MAPINFO", b"map MAP03 \"Gantlet\"")]);
        let names = names_from_bytes(wad.clone(), &Limits::default()).unwrap();
        assert_eq!(names.get("MAP03"), Some("Gantlet"));

        let zip = build_zip(&[("gantlet.wad", &wad)]);
        let names = names_from_bytes(zip, &Limits::default()).unwrap();
        assert_eq!(names.get("MAP03"), Some("Gantlet"));

        assert!(matches!(
            names_from_bytes(b"garbage".to_vec(), &Limits::default()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_seven_zip_wrapper_is_format_error() {
        let mut pk7 = b"7z\xBC\xAF\x27\x1C".to_vec();
        pk7.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            names_from_bytes(pk7, &Limits::default()),
            Err(Error::Format(_))
        ));
    }
}
