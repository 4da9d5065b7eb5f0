//! FileHound - Folder search and content-hash duplicate finder
//!
//! Walks chosen folders with depth limits and exclusion rules, matches file
//! names, and groups files with identical content.

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use filehound::cli::{commands, Cli, Commands};
use filehound::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    let configured = config.log_level();
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        configured.unwrap_or(LevelFilter::INFO)
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(EnvFilter::from_default_env().add_directive(format!("filehound={}", level).parse()?))
        .init();

    if configured.is_none() {
        tracing::warn!(
            "Unknown log level {:?} in config; using info",
            config.general.log_level
        );
    }

    match &cli.command {
        Commands::Search(args) => commands::run_search(args, &config)?,
        Commands::Dupes(args) => commands::run_dupes(args, &config)?,
        Commands::Config(args) => commands::run_config(args, &config)?,
    }

    Ok(())
}
