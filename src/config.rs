//! Configuration loading from TOML.
//!
//! Every field carries a serde default, so a missing config file means
//! all-defaults operation. The baselines are the operator-supplied
//! last-resort values the fetchers fall back to when every endpoint is
//! unavailable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Tracker configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrackerConfig {
    /// Jetski Pool explorer base URL.
    pub base_url: String,
    /// Fallback hashrate endpoint, same JSON shape as the primary.
    pub fallback_hashrate_url: String,
    /// XMR spot price endpoint (CoinGecko simple-price).
    pub price_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Last known-good network hashrate in GH/s.
    pub baseline_hashrate_ghs: f64,
    /// Last known-good XMR price in USD.
    pub baseline_price_usd: f64,
    /// Pool name (substring, case-sensitive) whose hashrate is tracked
    /// as the target actor.
    pub target_pool: String,
    pub user_agent: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://explorer.jetskipool.ai".to_string(),
            fallback_hashrate_url: "https://miningpoolstats.stream/monero".to_string(),
            price_url:
                "https://api.coingecko.com/api/v3/simple/price?ids=monero&vs_currencies=usd"
                    .to_string(),
            timeout_secs: 5,
            // Observed values, September 2025.
            baseline_hashrate_ghs: 4.97,
            baseline_price_usd: 167.0,
            target_pool: "Qubic".to_string(),
            user_agent: "MoneroRentalHashWar-OpenGame/1.0 (Research Tool)".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a TOML file. A missing file is not an
    /// error: the built-in defaults apply.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: TrackerConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
