//! Jetski Pool XMR tracker — Monero block-withholding threat monitor.
//!
//! Entry point. Parses arguments, initialises structured logging, loads
//! configuration, and runs the sampler once or in watch mode until
//! Ctrl+C.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use jetski_tracker::config::TrackerConfig;
use jetski_tracker::persist::Format;
use jetski_tracker::scheduler::Scheduler;
use jetski_tracker::snapshot::SnapshotBuilder;
use jetski_tracker::sources::JetskiClient;

/// Fetches live Monero network data from the Jetski Pool explorer and
/// derives a block-withholding threat score.
#[derive(Debug, Parser)]
#[command(name = "jetski-tracker", version)]
struct Args {
    /// Output file for the snapshot.
    #[arg(short, long, default_value = "jetski_data.json")]
    output: PathBuf,

    /// Continuously watch and update data.
    #[arg(short, long)]
    watch: bool,

    /// Update interval in seconds for watch mode.
    #[arg(short, long, default_value_t = 60)]
    interval: u64,

    /// Write a Haskell record literal instead of JSON.
    #[arg(long)]
    haskell: bool,

    /// Reproducibility seed for the scoring offset.
    #[arg(long, default_value_t = 1069)]
    seed: u64,

    /// Path to the TOML config file (defaults apply if missing).
    #[arg(long, default_value = "jetski.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config = TrackerConfig::load(&args.config)?;
    info!(
        base_url = %config.base_url,
        target_pool = %config.target_pool,
        seed = args.seed,
        "Tracker starting up"
    );

    let client = JetskiClient::new(config.clone())?;
    let builder = SnapshotBuilder::new(client, config.target_pool.clone(), args.seed);
    let format = if args.haskell {
        Format::Haskell
    } else {
        Format::Json
    };
    let scheduler = Scheduler::new(builder, args.output, format);

    if args.watch {
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        scheduler
            .run_watch(Duration::from_secs(args.interval), shutdown)
            .await?;
    } else {
        scheduler.run_once().await?;
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("jetski_tracker=info"));

    if std::env::var("JETSKI_LOG_JSON").is_ok() {
        fmt().json().with_env_filter(env_filter).with_target(true).init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
