//! Capture command: turn new save states into persisted sessions.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::Services;

pub fn run(services: &Services, slug: &str) -> Result<()> {
    eprintln!("Capturing sessions for {}...", slug);

    let captured = services
        .store
        .capture(slug)
        .with_context(|| format!("Failed to capture sessions for {}", slug))?;

    if captured == 0 {
        println!("No new sessions");
    } else {
        println!("Captured {} new sessions", captured.green());
    }
    Ok(())
}
