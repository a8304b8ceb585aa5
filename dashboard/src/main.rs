//! Nebula developer dashboard
//!
//! Telegram launch data can be passed in three ways, first match wins:
//! - `--init-data <RAW>`: raw `initData` or a `#tgWebAppData=...` fragment
//! - `--init-data-file <PATH>`: the same, read from a file
//! - `TELEGRAM_INIT_DATA` environment variable
//!
//! Without launch data the dashboard starts unauthenticated.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nebula_dashboard::config::Overrides;
use nebula_dashboard::identity::LaunchParams;

const INIT_DATA_ENV: &str = "TELEGRAM_INIT_DATA";

#[derive(Parser, Debug)]
#[command(name = "nebula-dashboard", version, about = "Nebula developer dashboard")]
struct Args {
    /// Telegram launch data (raw initData or launch URL fragment)
    #[arg(long, conflicts_with = "init_data_file")]
    init_data: Option<String>,

    /// File containing Telegram launch data
    #[arg(long, value_name = "PATH")]
    init_data_file: Option<PathBuf>,

    /// Catalog API base URL (overrides config.toml)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Start in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

/// Raw launch data from the arguments or environment.
fn launch_data(args: &Args, env: Option<String>) -> Result<Option<String>> {
    if let Some(raw) = &args.init_data {
        return Ok(Some(raw.clone()));
    }
    if let Some(path) = &args.init_data_file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read launch data from {}", path.display()))?;
        return Ok(Some(raw));
    }
    Ok(env.filter(|raw| !raw.trim().is_empty()))
}

/// Command-line settings that apply to this run only.
fn overrides(args: &Args) -> Overrides {
    Overrides {
        api_url: args.api_url.clone(),
        fullscreen: args.fullscreen,
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = nebula_dashboard::config::load();

    let raw = launch_data(&args, std::env::var(INIT_DATA_ENV).ok())?;
    if raw.is_none() {
        tracing::info!("No Telegram launch data supplied");
    }
    let bridge = LaunchParams::from_raw(raw.as_deref());

    nebula_dashboard::app::run(config, overrides(&args), Box::new(bridge))
        .context("Dashboard failed")?;

    Ok(())
}
