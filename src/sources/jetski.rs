//! Jetski Pool explorer client.
//!
//! Primary source for network hashrate, orphaned blocks, pool
//! distribution and reorg depth, plus the CoinGecko price fetch.
//!
//! Base URL: `https://explorer.jetskipool.ai`
//! Endpoints: `/api/network/hashrate`, `/api/blocks/orphaned`,
//! `/api/pools/distribution`, `/api/blocks/reorgs`.
//!
//! Every request carries the configured timeout (5s). Each metric
//! resolves through an ordered chain: primary endpoint, then a fallback
//! endpoint where one exists (hashrate only), then the last known-good
//! constant. Timeout, transport error, non-2xx, malformed body and
//! missing field are all the same outcome: fall through.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{baseline_distribution, MetricSource};
use crate::config::TrackerConfig;
use crate::types::PoolShare;

// ---------------------------------------------------------------------------
// API response types (explorer JSON → Rust)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct HashrateResponse {
    hashrate_ghs: f64,
}

#[derive(Debug, Deserialize)]
struct OrphanedResponse {
    orphaned_24h: u32,
}

#[derive(Debug, Deserialize)]
struct PoolsResponse {
    pools: Vec<PoolEntry>,
}

#[derive(Debug, Deserialize)]
struct PoolEntry {
    name: String,
    share: f64,
}

#[derive(Debug, Deserialize)]
struct ReorgsResponse {
    #[serde(default)]
    reorgs: Vec<ReorgEvent>,
}

#[derive(Debug, Deserialize)]
struct ReorgEvent {
    depth: u32,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the explorer, owning its own connection pool.
///
/// Constructed once and handed to the snapshot builder; no ambient or
/// global session state.
pub struct JetskiClient {
    http: Client,
    config: TrackerConfig,
}

impl JetskiClient {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build tracker HTTP client")?;
        Ok(Self { http, config })
    }

    /// GET a JSON body from one endpoint, treating non-2xx as an error.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed: {url}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("Explorer API error for {url}: {status}");
        }

        resp.json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {url}"))
    }

    async fn try_primary_hashrate(&self) -> Result<f64> {
        let url = format!("{}/api/network/hashrate", self.config.base_url);
        let data: HashrateResponse = self.get_json(&url).await?;
        Ok(data.hashrate_ghs)
    }

    /// The fallback endpoint serves the same JSON shape as the primary.
    async fn try_fallback_hashrate(&self) -> Result<f64> {
        let data: HashrateResponse = self.get_json(&self.config.fallback_hashrate_url).await?;
        Ok(data.hashrate_ghs)
    }

    async fn try_orphaned_blocks(&self) -> Result<u32> {
        let url = format!("{}/api/blocks/orphaned", self.config.base_url);
        let data: OrphanedResponse = self.get_json(&url).await?;
        Ok(data.orphaned_24h)
    }

    async fn try_pool_distribution(&self) -> Result<Vec<PoolShare>> {
        let url = format!("{}/api/pools/distribution", self.config.base_url);
        let data: PoolsResponse = self.get_json(&url).await?;
        if data.pools.is_empty() {
            anyhow::bail!("Explorer returned an empty pool list");
        }
        Ok(data
            .pools
            .into_iter()
            .map(|p| (p.name, p.share))
            .collect())
    }

    /// Max depth over the recently reported reorg events; an empty list
    /// is a valid observation of zero, not a failure.
    async fn try_last_reorg_depth(&self) -> Result<u32> {
        let url = format!("{}/api/blocks/reorgs", self.config.base_url);
        let data: ReorgsResponse = self.get_json(&url).await?;
        Ok(data.reorgs.iter().map(|r| r.depth).max().unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// Total resolution chains
// ---------------------------------------------------------------------------

#[async_trait]
impl MetricSource for JetskiClient {
    async fn network_hashrate(&self) -> f64 {
        match self.try_primary_hashrate().await {
            Ok(v) => {
                debug!(hashrate_ghs = v, "Network hashrate from primary");
                return v;
            }
            Err(e) => warn!(error = %e, "Primary hashrate source unavailable"),
        }
        match self.try_fallback_hashrate().await {
            Ok(v) => {
                debug!(hashrate_ghs = v, "Network hashrate from fallback");
                v
            }
            Err(e) => {
                warn!(
                    error = %e,
                    baseline = self.config.baseline_hashrate_ghs,
                    "Fallback hashrate source unavailable, using baseline"
                );
                self.config.baseline_hashrate_ghs
            }
        }
    }

    async fn orphaned_blocks(&self) -> u32 {
        match self.try_orphaned_blocks().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Orphaned-block source unavailable, assuming 0");
                0
            }
        }
    }

    async fn pool_distribution(&self) -> Vec<PoolShare> {
        match self.try_pool_distribution().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Pool distribution unavailable, using baseline");
                baseline_distribution()
            }
        }
    }

    async fn last_reorg_depth(&self) -> u32 {
        match self.try_last_reorg_depth().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Reorg source unavailable, assuming 0");
                0
            }
        }
    }

    async fn price_usd(&self) -> f64 {
        match super::coingecko::fetch_spot_price(&self.http, &self.config.price_url).await {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    error = %e,
                    baseline = self.config.baseline_price_usd,
                    "Price source unavailable, using baseline"
                );
                self.config.baseline_price_usd
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
