//! Lumps command: debug listing of a container's directory.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use wadlog_core::{Config, ContainerListing};

pub fn run(file: &Path, config: &Config) -> Result<()> {
    let listing = ContainerListing::from_path(file, &config.limits)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    println!("{} ({} entries)", listing.kind, listing.rows.len());
    for row in &listing.rows {
        let offset = row
            .offset
            .map(|o| format!("0x{:08X}", o))
            .unwrap_or_else(|| "-".to_string());
        match row.definition {
            Some(kind) => println!(
                "  {:>10}  {:>10}  {}  [{}]",
                offset,
                row.size,
                row.name.green(),
                kind
            ),
            None => println!("  {:>10}  {:>10}  {}", offset, row.size, row.name),
        }
    }

    let definitions = listing.definitions().count();
    eprintln!("{} map-definition lumps", definitions);
    Ok(())
}
