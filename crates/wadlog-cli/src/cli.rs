//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wadlog")]
#[command(version, about = "Level names and play statistics for Doom-engine content")]
pub struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "wadlog.toml", env = "WADLOG_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the level names known for a content slug
    Names {
        slug: String,

        /// Re-extract names from the installed file
        #[arg(long)]
        refresh: bool,
    },

    /// Re-extract level names for every slug in the download ledger
    Rescan,

    /// Capture new play sessions from a slug's save directory
    Capture { slug: String },

    /// List captured sessions for a slug
    Sessions { slug: String },

    /// Show the best result per level and skill for a slug
    Best { slug: String },

    /// List the lumps of a WAD or the entries of a zip wrapper
    Lumps { file: PathBuf },
}
