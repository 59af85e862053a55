//! Command-line entry point for priceguard.

use anyhow::Context;
use clap::{Parser, Subcommand};
use priceguard_core::ScanConfig;
use priceguard_normalize::load_snapshot;
use priceguard_report::summarize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "priceguard", version, about = "Marketplace price gouging scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a catalog snapshot and write the summary artifact.
    Scan {
        /// Path to the snapshot JSON file.
        #[arg(long)]
        input: PathBuf,
        /// Path the summary JSON is written to.
        #[arg(long)]
        output: PathBuf,
        /// Optional scan configuration JSON. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit compact JSON instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Scan {
            input,
            output,
            config,
            compact,
        } => run_scan(&input, &output, config.as_deref(), compact),
    }
}

fn run_scan(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    compact: bool,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => ScanConfig::default(),
    };

    let families = load_snapshot(input)
        .with_context(|| format!("failed to load snapshot from {}", input.display()))?;
    info!(families = families.len(), "snapshot loaded");

    let summary = summarize(&families, &config);

    let body = if compact {
        serde_json::to_string(&summary)?
    } else {
        serde_json::to_string_pretty(&summary)?
    };
    fs::write(output, body)
        .with_context(|| format!("failed to write summary to {}", output.display()))?;

    info!(
        output = %output.display(),
        total_listings = summary.total_listings,
        gouged = summary.total_gouged_listings,
        health = summary.marketplace_health_score,
        "scan complete"
    );
    println!(
        "Scanned {} products ({} listings): {} gouged, health score {:.2}",
        summary.total_products,
        summary.total_listings,
        summary.total_gouged_listings,
        summary.marketplace_health_score
    );

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ScanConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config from {}", path.display()))
}
