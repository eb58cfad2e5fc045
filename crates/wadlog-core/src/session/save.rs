//! Save-state archive parsing.
//!
//! The engine writes saves as zip archives. Two entries matter:
//!
//! - `globals.json`: difficulty and the `statistics` object with one record
//!   per completed level (`levelname`, `killcount`, `totalkills`, ...)
//! - `info.json` (optional): save metadata whose `Comment` starts with a
//!   status line such as `MAP13 - Polychromatic Terrace`

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::archive::ArchiveReader;
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::names::canonical_id;
use crate::session::{LevelPlayStats, PlaySession, SCHEMA_VERSION, SkillTier};

/// Entry holding difficulty and level statistics
pub const STATS_ENTRY: &str = "globals.json";

/// Optional entry holding the free-text status line
pub const META_ENTRY: &str = "info.json";

static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(MAP\d+|E\d+M\d+)\s*-\s*(.+)$").expect("valid status line pattern")
});

#[derive(Debug, Deserialize)]
struct RawGlobals {
    skill: Option<JsonValue>,
    #[serde(default)]
    servercvars: HashMap<String, JsonValue>,
    statistics: Option<RawStatistics>,
}

#[derive(Debug, Deserialize)]
struct RawStatistics {
    #[serde(default)]
    startlevel: Option<String>,
    #[serde(default)]
    levels: Vec<RawLevel>,
}

/// Per-level record with the engine's field names
#[derive(Debug, Deserialize)]
struct RawLevel {
    levelname: String,
    #[serde(default)]
    killcount: u32,
    #[serde(default)]
    totalkills: u32,
    #[serde(default)]
    itemcount: u32,
    #[serde(default)]
    totalitems: u32,
    #[serde(default)]
    secretcount: u32,
    #[serde(default)]
    totalsecrets: u32,
    #[serde(default)]
    leveltime: u64,
}

impl From<RawLevel> for LevelPlayStats {
    fn from(raw: RawLevel) -> Self {
        let id = canonical_id(&raw.levelname);
        Self {
            name: id.clone(),
            id,
            kills: raw.killcount,
            total_kills: raw.totalkills,
            items: raw.itemcount,
            total_items: raw.totalitems,
            secrets: raw.secretcount,
            total_secrets: raw.totalsecrets,
            time_tics: raw.leveltime,
        }
    }
}

impl RawGlobals {
    fn skill(&self) -> SkillTier {
        let code = self
            .skill
            .as_ref()
            .or_else(|| self.servercvars.get("skill"))
            .and_then(json_code);

        match code {
            Some(code) => SkillTier::from_code(code).unwrap_or_else(|| {
                debug!("Difficulty code {} out of range, using default", code);
                SkillTier::default()
            }),
            None => SkillTier::default(),
        }
    }
}

/// Integer from a JSON number or numeric string (cvars are stored as strings)
fn json_code(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A parsed save, complete except for its capture time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    pub content_slug: String,
    pub start_level: String,
    pub skill: SkillTier,
    pub source_file: String,
    pub levels: Vec<LevelPlayStats>,
    /// Title recovered from the metadata status line
    pub status_name: Option<(String, String)>,
}

impl SessionDraft {
    /// (id, name) pairs this save knows a real title for
    pub fn discovered_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.status_name
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
            .chain(
                self.levels
                    .iter()
                    .filter(|level| !level.is_unnamed())
                    .map(|level| (level.id.as_str(), level.name.as_str())),
            )
    }

    pub fn into_session(self, captured_at: chrono::DateTime<chrono::Utc>) -> PlaySession {
        PlaySession {
            schema_version: SCHEMA_VERSION,
            content_slug: self.content_slug,
            start_level: self.start_level,
            skill: self.skill,
            captured_at,
            source_file: self.source_file,
            levels: self.levels,
        }
    }
}

/// Match a status line like `MAP13 - Polychromatic Terrace`.
///
/// Only the first line of multi-line text is considered.
pub fn parse_status_line(text: &str) -> Option<(String, String)> {
    let line = text.lines().next()?.trim();
    let caps = STATUS_LINE.captures(line)?;
    let name = caps[2].trim();
    if name.is_empty() {
        return None;
    }
    Some((canonical_id(&caps[1]), name.to_string()))
}

/// Turns save-state archives into session drafts
#[derive(Debug, Clone, Default)]
pub struct SaveStateParser {
    limits: Limits,
}

impl SaveStateParser {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Parse a save file.
    ///
    /// `Ok(None)` means the archive holds no statistics and is not a
    /// capturable save.
    pub fn parse_file(&self, path: &Path, slug: &str) -> Result<Option<SessionDraft>> {
        let source_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let mut archive = ArchiveReader::open(path, &self.limits)?;
        parse_archive(&mut archive, slug, source_file)
    }

    /// Parse a save already read into memory
    pub fn parse_bytes(
        &self,
        bytes: Vec<u8>,
        slug: &str,
        source_file: &str,
    ) -> Result<Option<SessionDraft>> {
        let mut archive = ArchiveReader::from_bytes(bytes, &self.limits)?;
        parse_archive(&mut archive, slug, source_file.to_string())
    }
}

fn parse_archive(
    archive: &mut ArchiveReader,
    slug: &str,
    source_file: String,
) -> Result<Option<SessionDraft>> {
    let Some(globals) = archive.read(STATS_ENTRY)? else {
        debug!("{} has no {}, not a capturable save", source_file, STATS_ENTRY);
        return Ok(None);
    };

    let globals: RawGlobals = serde_json::from_slice(&globals)
        .map_err(|e| Error::parse(&source_file, format!("{}: {}", STATS_ENTRY, e)))?;
    let skill = globals.skill();

    let Some(statistics) = globals.statistics else {
        debug!("{} has no statistics, not a capturable save", source_file);
        return Ok(None);
    };

    let mut levels: Vec<LevelPlayStats> = statistics
        .levels
        .into_iter()
        .map(LevelPlayStats::from)
        .filter(|level| !level.id.is_empty())
        .collect();
    if levels.is_empty() {
        debug!("{} has no completed levels yet", source_file);
        return Ok(None);
    }

    let start_level = statistics
        .startlevel
        .map(|id| canonical_id(&id))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| levels[0].id.clone());

    let status_name = read_status_name(archive, &source_file);
    if let Some((id, name)) = &status_name {
        for level in levels.iter_mut().filter(|l| &l.id == id && l.is_unnamed()) {
            level.name = name.clone();
        }
    }

    Ok(Some(SessionDraft {
        content_slug: slug.to_string(),
        start_level,
        skill,
        source_file,
        levels,
        status_name,
    }))
}

/// The metadata entry is optional; any problem with it just yields no name
fn read_status_name(archive: &mut ArchiveReader, source_file: &str) -> Option<(String, String)> {
    let bytes = match archive.read(META_ENTRY) {
        Ok(bytes) => bytes?,
        Err(e) => {
            debug!("{}: unreadable {}: {}", source_file, META_ENTRY, e);
            return None;
        }
    };

    let meta: JsonValue = match serde_json::from_slice(&bytes) {
        Ok(meta) => meta,
        Err(e) => {
            debug!("{}: malformed {}: {}", source_file, META_ENTRY, e);
            return None;
        }
    };

    let comment = meta
        .get("Comment")
        .or_else(|| meta.get("comment"))
        .and_then(JsonValue::as_str)?;
    parse_status_line(comment)
}
