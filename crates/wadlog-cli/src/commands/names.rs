//! Names command: show the resolved level names for a slug.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::Services;

pub fn run(services: &Services, slug: &str, refresh: bool) -> Result<()> {
    let names = if refresh {
        eprintln!("Re-extracting level names for {}...", slug);
        services.resolver.refresh(slug)
    } else {
        services.resolver.resolve(slug)
    }
    .with_context(|| format!("Failed to resolve level names for {}", slug))?;

    let Some(names) = names else {
        eprintln!("No level names known for {}", slug);
        return Ok(());
    };

    for (id, name) in names.iter() {
        println!("{:<8} {}", id.bold(), name);
    }
    eprintln!("{} level names", names.len());

    Ok(())
}
