//! Cache Manager - maintenance tool for the weather proxy cache database
//!
//! `cache_manager view` prints cache statistics and recent entries,
//! `cache_manager clear` deletes every cached response.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_proxy::cache::{current_timestamp, CacheStore};
use weather_proxy::config::DEFAULT_DB_PATH;
use weather_proxy::inspect::{clear_and_report, render_view};

/// Weather App Cache Manager
#[derive(Parser, Debug)]
#[command(name = "cache_manager")]
#[command(about = "Inspect or clear the weather proxy cache database")]
#[command(version)]
struct Cli {
    /// Path of the cache database
    #[arg(long, env = "DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Show entry counts, database size and the most recent entries
    View,
    /// Delete all cached entries
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_proxy=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // DB_PATH may come from a .env file
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let cli = Cli::parse();

    if !cli.db.exists() {
        if let Some(dir) = cli.db.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("cannot create directory {}", dir.display()))?;
        }
        println!(
            "Database not found at {}. It will be created when the app is first run.",
            cli.db.display()
        );
        return Ok(());
    }

    let store = CacheStore::open(&cli.db)
        .with_context(|| format!("cannot open cache database {}", cli.db.display()))?;

    match cli.action {
        Action::View => print!("{}", render_view(&store, current_timestamp())?),
        Action::Clear => println!("{}", clear_and_report(&store)?),
    }

    Ok(())
}
