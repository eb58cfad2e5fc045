//! Content fingerprint for captured sessions.
//!
//! The digest is XXH3-64 (seed 0) over this byte string:
//!
//! ```text
//! slug US skill US start_level
//! ( RS id US kills US totalKills US items US totalItems US secrets US totalSecrets US timeTics )*
//! ```
//!
//! where US is 0x1F, RS is 0x1E, the skill is its persisted id (`uv`) and
//! counters are decimal. Capture time, source file and display names are
//! not part of it, so re-saving the same game state yields the same value.

use std::fmt;

use xxhash_rust::xxh3::xxh3_64;

use crate::session::{LevelPlayStats, SkillTier};

const UNIT_SEPARATOR: char = '\u{1f}';
const RECORD_SEPARATOR: char = '\u{1e}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionFingerprint(u64);

impl SessionFingerprint {
    pub fn compute(
        slug: &str,
        skill: SkillTier,
        start_level: &str,
        levels: &[LevelPlayStats],
    ) -> Self {
        Self(xxh3_64(canonical_bytes(slug, skill, start_level, levels).as_bytes()))
    }
}

/// 16 lowercase hex digits, used as the session file stem
impl fmt::Display for SessionFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

fn canonical_bytes(
    slug: &str,
    skill: SkillTier,
    start_level: &str,
    levels: &[LevelPlayStats],
) -> String {
    let mut out = String::new();
    out.push_str(slug);
    out.push(UNIT_SEPARATOR);
    out.push_str(skill.id());
    out.push(UNIT_SEPARATOR);
    out.push_str(start_level);

    for level in levels {
        out.push(RECORD_SEPARATOR);
        out.push_str(&level.id);
        for value in [
            level.kills as u64,
            level.total_kills as u64,
            level.items as u64,
            level.total_items as u64,
            level.secrets as u64,
            level.total_secrets as u64,
            level.time_tics,
        ] {
            out.push(UNIT_SEPARATOR);
            out.push_str(&value.to_string());
        }
    }
    out
}
