mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use wadlog_core::Config;

use cli::{Args, Command};
use commands::Services;

fn main() -> Result<()> {
    // Logs go to stderr so command output can be piped
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wadlog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(c) => {
            debug!("Loaded config from {:?}", args.config);
            c
        }
        Err(e) if e.is_not_found() => {
            debug!("No config at {:?}, using defaults", args.config);
            Config::default()
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    };

    match args.command {
        Command::Names { slug, refresh } => {
            commands::names::run(&Services::new(&config)?, &slug, refresh)
        }
        Command::Rescan => commands::rescan::run(&Services::new(&config)?),
        Command::Capture { slug } => commands::capture::run(&Services::new(&config)?, &slug),
        Command::Sessions { slug } => commands::sessions::run(&Services::new(&config)?, &slug),
        Command::Best { slug } => commands::best::run(&Services::new(&config)?, &slug),
        Command::Lumps { file } => commands::lumps::run(&file, &config),
    }
}
