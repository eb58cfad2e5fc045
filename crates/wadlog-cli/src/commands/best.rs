//! Best command: best result per level and skill.

use std::sync::Arc;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use wadlog_core::{StatsAggregator, format_tics};

use super::Services;

pub fn run(services: &Services, slug: &str) -> Result<()> {
    let aggregator = StatsAggregator::new(Arc::clone(&services.store));
    let best = aggregator
        .best_per_level_skill(slug)
        .with_context(|| format!("Failed to aggregate sessions for {}", slug))?;

    if best.is_empty() {
        eprintln!("No sessions captured for {}", slug);
        return Ok(());
    }

    println!(
        "{:<8} {:<5} {:<32} {:>9} {:>7}",
        "LEVEL".bold(),
        "SKILL".bold(),
        "NAME".bold(),
        "KILLS".bold(),
        "TIME".bold()
    );
    for entry in &best {
        let stats = &entry.stats;
        let kills = format!("{:>9}", format!("{}/{}", stats.kills, stats.total_kills));
        let kills = if stats.total_kills > 0 && stats.kills >= stats.total_kills {
            kills.green().to_string()
        } else {
            kills
        };
        println!(
            "{:<8} {:<5} {:<32} {} {:>7}",
            stats.id,
            entry.skill.id(),
            stats.name,
            kills,
            format_tics(stats.time_tics)
        );
    }

    eprintln!("{} levels played", aggregator.unique_levels_played(slug)?);
    Ok(())
}
