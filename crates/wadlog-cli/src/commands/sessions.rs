//! Sessions command: list captured sessions, oldest first.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use wadlog_core::{format_tics, stats};

use super::Services;

pub fn run(services: &Services, slug: &str) -> Result<()> {
    let mut sessions = services
        .store
        .load_all(slug)
        .with_context(|| format!("Failed to load sessions for {}", slug))?;
    sessions.sort_by_key(|s| s.captured_at);

    if sessions.is_empty() {
        eprintln!("No sessions captured for {}", slug);
        return Ok(());
    }

    for session in &sessions {
        println!(
            "{} {} {} start {} ({})",
            session.fingerprint().to_string().dimmed(),
            session.captured_at.format("%Y-%m-%d %H:%M"),
            session.skill.label().bold(),
            session.start_level,
            session.source_file
        );
        for level in &session.levels {
            println!(
                "    {:<8} {:<32} K {}/{}  I {}/{}  S {}/{}  {}",
                level.id,
                level.name,
                level.kills,
                level.total_kills,
                level.items,
                level.total_items,
                level.secrets,
                level.total_secrets,
                format_tics(level.time_tics)
            );
        }
    }

    let summary = stats::summarize(&sessions);
    eprintln!(
        "{} sessions, {} unique levels, {} total",
        summary.sessions,
        summary.unique_levels,
        format_tics(summary.total_tics)
    );
    Ok(())
}
