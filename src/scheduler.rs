//! Sampling scheduler.
//!
//! Drives the snapshot builder once or on a fixed interval, feeding each
//! snapshot to the persister and the status log. Watch mode runs until
//! the supplied shutdown future resolves, checked at the loop boundary,
//! and a failed tick never takes the loop down: live monitoring value
//! outweighs one missed persist.

use anyhow::Result;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use crate::persist::{self, Format};
use crate::snapshot::SnapshotBuilder;
use crate::sources::MetricSource;
use crate::types::{Snapshot, ThreatTier};

pub struct Scheduler<S: MetricSource> {
    builder: SnapshotBuilder<S>,
    output: PathBuf,
    format: Format,
}

impl<S: MetricSource> Scheduler<S> {
    pub fn new(builder: SnapshotBuilder<S>, output: PathBuf, format: Format) -> Self {
        Self {
            builder,
            output,
            format,
        }
    }

    /// Build, log and persist one snapshot. A persistence failure is a
    /// hard failure here; the caller decides the exit code.
    pub async fn run_once(&self) -> Result<Snapshot> {
        let snapshot = self.builder.build().await?;
        log_status(&snapshot);
        persist::save(&snapshot, &self.output, self.format)?;
        info!(path = %self.output.display(), "Snapshot saved");
        Ok(snapshot)
    }

    /// Loop until `shutdown` resolves: build, log, persist, sleep.
    ///
    /// Failures within a tick are logged and the loop continues to the
    /// next interval. Cancellation is observed between ticks, so the
    /// last-written file is never left partial.
    pub async fn run_watch(
        &self,
        interval: Duration,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        tokio::pin!(shutdown);

        info!(
            interval_secs = interval.as_secs_f64(),
            path = %self.output.display(),
            "Watching network. Press Ctrl+C to stop."
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "Tick failed, continuing to next"),
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received, monitoring stopped");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Per-tick status line with the threat tier.
fn log_status(snapshot: &Snapshot) {
    let tier = ThreatTier::from_score(snapshot.withholding_score);
    info!(
        network_ghs = format!("{:.2}", snapshot.network_hashrate),
        target_ghs = format!("{:.2}", snapshot.target_actor_hashrate),
        orphans_24h = snapshot.orphaned_blocks_24h,
        reorg_depth = snapshot.last_reorg_depth,
        score = format!("{:.4}", snapshot.withholding_score),
        price_usd = format!("{:.2}", snapshot.price),
        tier = %tier,
        "Network status"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
