//! Read-only aggregation over captured sessions.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::session::{LevelPlayStats, PlaySession, SessionStore, SkillTier, TICS_PER_SECOND};

/// Best recorded result for one (level, skill) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestEntry {
    pub skill: SkillTier,
    pub stats: LevelPlayStats,
}

/// Totals across every session of a slug
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub sessions: usize,
    pub unique_levels: usize,
    pub total_tics: u64,
}

pub struct StatsAggregator {
    store: Arc<SessionStore>,
}

impl StatsAggregator {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Best entry per (level id, skill), ordered by level id then skill
    pub fn best_per_level_skill(&self, slug: &str) -> Result<Vec<BestEntry>> {
        Ok(best_per_level_skill(&self.store.load_all(slug)?))
    }

    pub fn unique_levels_played(&self, slug: &str) -> Result<usize> {
        Ok(unique_levels(&self.store.load_all(slug)?))
    }

    pub fn summary(&self, slug: &str) -> Result<StatsSummary> {
        Ok(summarize(&self.store.load_all(slug)?))
    }
}

/// Keep the highest kill count per (level id, skill); equal kills go to the
/// lower elapsed time.
pub fn best_per_level_skill(sessions: &[PlaySession]) -> Vec<BestEntry> {
    let mut best: BTreeMap<(&str, SkillTier), &LevelPlayStats> = BTreeMap::new();

    for session in sessions {
        for level in &session.levels {
            best.entry((level.id.as_str(), session.skill))
                .and_modify(|current| {
                    if beats(level, *current) {
                        *current = level;
                    }
                })
                .or_insert(level);
        }
    }

    best.into_iter()
        .map(|((_, skill), stats)| BestEntry {
            skill,
            stats: stats.clone(),
        })
        .collect()
}

fn beats(candidate: &LevelPlayStats, current: &LevelPlayStats) -> bool {
    candidate.kills > current.kills
        || (candidate.kills == current.kills && candidate.time_tics < current.time_tics)
}

pub fn unique_levels(sessions: &[PlaySession]) -> usize {
    sessions
        .iter()
        .flat_map(|s| s.levels.iter().map(|l| l.id.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

pub fn summarize(sessions: &[PlaySession]) -> StatsSummary {
    StatsSummary {
        sessions: sessions.len(),
        unique_levels: unique_levels(sessions),
        total_tics: sessions.iter().map(PlaySession::total_tics).sum(),
    }
}

/// Render engine ticks as `m:ss`
pub fn format_tics(tics: u64) -> String {
    let seconds = tics / TICS_PER_SECOND;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
