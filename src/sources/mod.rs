//! Metric sources.
//!
//! Defines the `MetricSource` trait the snapshot builder consumes and the
//! fixed baseline pool distribution used when no live data is available.
//!
//! Every method on the trait is total: implementations resolve failures
//! internally (primary → fallback → last-resort constant) and always
//! return a usable value. Defaulting to "no anomaly" for orphans and
//! reorgs keeps the scorer conservative under source outages instead of
//! taking the whole pipeline down.

pub mod coingecko;
pub mod jetski;

use async_trait::async_trait;

use crate::types::PoolShare;

pub use jetski::JetskiClient;

/// Abstraction over the live network-health sources.
///
/// All five fetches are independent and side-effect-free on shared
/// state, so callers may invoke them in any order.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Current network hashrate in GH/s.
    async fn network_hashrate(&self) -> f64;

    /// Orphaned blocks observed in the last 24 hours.
    async fn orphaned_blocks(&self) -> u32;

    /// Pool hashrate distribution in source order. Never empty.
    async fn pool_distribution(&self) -> Vec<PoolShare>;

    /// Depth of the deepest recent reorg event, 0 if none.
    async fn last_reorg_depth(&self) -> u32;

    /// XMR spot price in USD.
    async fn price_usd(&self) -> f64;
}

/// Fixed baseline pool distribution, used when the live distribution is
/// unavailable. Five buckets at equal 0.20 shares: sums to 1.0, and the
/// max share sits below the 0.3 concentration floor so the baseline
/// alone never signals concentration risk.
pub fn baseline_distribution() -> Vec<PoolShare> {
    vec![
        ("Qubic".to_string(), 0.20),
        ("MineXMR".to_string(), 0.20),
        ("SupportXMR".to_string(), 0.20),
        ("Hashvault".to_string(), 0.20),
        ("Others".to_string(), 0.20),
    ]
}
