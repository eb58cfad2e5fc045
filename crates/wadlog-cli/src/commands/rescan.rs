//! Rescan command: re-extract level names for every ledger slug.

use anyhow::Result;

use super::Services;

pub fn run(services: &Services) -> Result<()> {
    eprintln!("Rescanning installed content...");
    let resolved = services.resolver.rescan();
    println!("{} slugs with level names", resolved);
    Ok(())
}
