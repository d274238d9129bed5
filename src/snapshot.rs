//! Snapshot assembly.
//!
//! Orchestrates the five metric fetches, derives the target pool's
//! absolute hashrate from its distribution share, scores the result and
//! stamps the capture time. Produces exactly one `Snapshot` per call,
//! never a partial one.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::score::withholding_score;
use crate::sources::MetricSource;
use crate::types::Snapshot;

pub struct SnapshotBuilder<S: MetricSource> {
    source: S,
    target_pool: String,
    seed: u64,
}

impl<S: MetricSource> SnapshotBuilder<S> {
    pub fn new(source: S, target_pool: impl Into<String>, seed: u64) -> Self {
        Self {
            source,
            target_pool: target_pool.into(),
            seed,
        }
    }

    /// Fetch all metrics and assemble one snapshot.
    ///
    /// The fetches are independent and each is total, so the order is
    /// immaterial and this cannot half-fail: the only fallible step is
    /// scoring, and the source contract guarantees the non-empty
    /// distribution it requires.
    pub async fn build(&self) -> Result<Snapshot> {
        let network_hashrate = self.source.network_hashrate().await;
        let pool_distribution = self.source.pool_distribution().await;
        let orphaned_blocks_24h = self.source.orphaned_blocks().await;
        let last_reorg_depth = self.source.last_reorg_depth().await;
        let price = self.source.price_usd().await;

        let target_share = self.target_share(&pool_distribution);
        let withholding_score =
            withholding_score(orphaned_blocks_24h, &pool_distribution, self.seed)
                .context("Scoring failed")?;

        let snapshot = Snapshot {
            network_hashrate,
            target_actor_hashrate: network_hashrate * target_share,
            orphaned_blocks_24h,
            withholding_score,
            pool_distribution,
            last_reorg_depth,
            captured_at: Utc::now().timestamp_micros() as f64 / 1e6,
            price,
        };

        info!(
            target_pool = %self.target_pool,
            target_share,
            score = snapshot.withholding_score,
            "Snapshot assembled"
        );

        Ok(snapshot)
    }

    /// Share of the first pool whose name contains the target identifier
    /// (case-sensitive). 0.0 when absent.
    fn target_share(&self, pools: &[(String, f64)]) -> f64 {
        pools
            .iter()
            .find(|(name, _)| name.contains(&self.target_pool))
            .map(|(_, share)| *share)
            .unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
