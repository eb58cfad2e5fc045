use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::names::LevelNameMap;
use crate::session::{SessionFingerprint, SkillTier};

/// Version written to every persisted session
pub const SCHEMA_VERSION: u32 = 1;

/// Engine ticks per second
pub const TICS_PER_SECOND: u64 = 35;

/// Statistics for one completed level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPlayStats {
    pub id: String,
    /// Display name; equals `id` until a title is known
    pub name: String,
    pub kills: u32,
    pub total_kills: u32,
    pub items: u32,
    pub total_items: u32,
    pub secrets: u32,
    pub total_secrets: u32,
    /// Elapsed time in 1/35 second ticks
    pub time_tics: u64,
}

impl LevelPlayStats {
    /// Whether the display name is still the bare id
    pub fn is_unnamed(&self) -> bool {
        self.name == self.id
    }

    /// Replace a bare-id name from the map. Returns true if changed.
    pub fn backfill_name(&mut self, names: &LevelNameMap) -> bool {
        if !self.is_unnamed() {
            return false;
        }
        match names.get(&self.id) {
            Some(name) => {
                self.name = name.to_string();
                true
            }
            None => false,
        }
    }
}

/// One captured play session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySession {
    pub schema_version: u32,
    pub content_slug: String,
    pub start_level: String,
    pub skill: SkillTier,
    pub captured_at: DateTime<Utc>,
    pub source_file: String,
    pub levels: Vec<LevelPlayStats>,
}

impl PlaySession {
    pub fn fingerprint(&self) -> SessionFingerprint {
        SessionFingerprint::compute(&self.content_slug, self.skill, &self.start_level, &self.levels)
    }

    /// Fill bare-id level names from the map. Returns the number changed.
    pub fn backfill_names(&mut self, names: &LevelNameMap) -> usize {
        self.levels
            .iter_mut()
            .map(|level| level.backfill_name(names))
            .filter(|&changed| changed)
            .count()
    }

    /// Check a loaded session against the schema and its owning slug
    pub fn validate(&self, slug: &str) -> Result<(), String> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(format!(
                "schema version {} (expected {})",
                self.schema_version, SCHEMA_VERSION
            ));
        }
        if self.content_slug != slug {
            return Err(format!(
                "content slug {:?} does not match {:?}",
                self.content_slug, slug
            ));
        }
        if self.start_level.trim().is_empty() {
            return Err("empty start level".to_string());
        }
        if self.levels.is_empty() {
            return Err("no levels".to_string());
        }
        if self.levels.iter().any(|level| level.id.trim().is_empty()) {
            return Err("level with empty id".to_string());
        }
        Ok(())
    }

    pub fn total_tics(&self) -> u64 {
        self.levels.iter().map(|level| level.time_tics).sum()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{level, session};
    use super::*;

    #[test]
    fn test_json_field_names() {
        let s = session("sunlust", SkillTier::UltraViolence, vec![level("MAP01", 10, 5000)]);
        let value = serde_json::to_value(&s).unwrap();

        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["contentSlug"], "sunlust");
        assert_eq!(value["startLevel"], "MAP01");
        assert_eq!(value["skill"], "uv");
        assert_eq!(value["sourceFile"], "save01.zds");
        assert!(value["capturedAt"].as_str().unwrap().starts_with("2023-11-14T"));
        let first = &value["levels"][0];
        assert_eq!(first["totalKills"], 20);
        assert_eq!(first["totalSecrets"], 2);
        assert_eq!(first["timeTics"], 5000);
    }

    #[test]
    fn test_validate() {
        let good = session("a", SkillTier::HurtMePlenty, vec![level("MAP01", 1, 1)]);
        assert!(good.validate("a").is_ok());
        assert!(good.validate("b").is_err());

        let mut wrong_version = good.clone();
        wrong_version.schema_version = 9;
        assert!(wrong_version.validate("a").is_err());

        let mut empty = good.clone();
        empty.levels.clear();
        assert!(empty.validate("a").is_err());
    }

    #[test]
    fn test_backfill_only_unnamed() {
        let mut s = session(
            "a",
            SkillTier::HurtMePlenty,
            vec![level("MAP01", 1, 1), level("MAP02", 1, 1)],
        );
        s.levels[1].name = "Custom".to_string();

        let mut names = LevelNameMap::new();
        names.insert("MAP01", "Entryway");
        names.insert("MAP02", "Underhalls");

        assert_eq!(s.backfill_names(&names), 1);
        assert_eq!(s.levels[0].name, "Entryway");
        assert_eq!(s.levels[1].name, "Custom");
    }

    #[test]
    fn test_fingerprint_ignores_names_and_capture_metadata() {
        let a = session("a", SkillTier::UltraViolence, vec![level("MAP01", 10, 5000)]);
        let mut b = a.clone();
        b.levels[0].name = "Entryway".to_string();
        b.source_file = "auto02.zds".to_string();
        b.captured_at = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = a.clone();
        c.levels[0].kills = 11;
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
