//! Pair market maker - snapshot replay entry point.
//!
//! Reads JSON-lines market snapshots, runs one strategy tick per snapshot
//! and prints the resulting orders as JSON lines on stdout.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use pairmm_bot::{AppConfig, Replayer};
use pairmm_mm::PairMaker;
use pairmm_telemetry::Metrics;
use tracing::info;

/// Pair market maker snapshot replay
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PAIRMM_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON-lines snapshot file, or "-" for stdin
    snapshots: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    pairmm_telemetry::init_logging()?;

    info!("Starting pairmm-bot v{}", env!("CARGO_PKG_VERSION"));

    let config_path = AppConfig::resolve_path(args.config);
    info!(config_path = %config_path, "Loading configuration");

    let config = AppConfig::load(&config_path)?;
    info!(
        reference = %config.maker.reference_instrument,
        derived = %config.maker.derived_instrument,
        ratio = %config.maker.price_ratio,
        "Configuration loaded"
    );

    let maker = PairMaker::new(config.maker.clone())?;
    let replayer = Replayer::new(maker, config.telemetry.metrics_enabled);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = if args.snapshots == "-" {
        replayer.run(io::stdin().lock(), &mut out)?
    } else {
        let file = File::open(&args.snapshots)
            .with_context(|| format!("Failed to open snapshots: {}", args.snapshots))?;
        replayer.run(BufReader::new(file), &mut out)?
    };

    if let Some(path) = &config.telemetry.metrics_path {
        if config.telemetry.metrics_enabled {
            std::fs::write(path, Metrics::gather_text()?)
                .with_context(|| format!("Failed to write metrics: {}", path.display()))?;
            info!(path = %path.display(), "Metrics written");
        }
    }

    info!(ticks = summary.ticks, orders = summary.orders, "Done");
    Ok(())
}
