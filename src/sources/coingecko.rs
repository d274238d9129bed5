//! CoinGecko spot-price source.
//!
//! Single GET against the simple-price endpoint. No API key required at
//! this request volume; rate limiting and auth are the caller's problem,
//! not ours — any failure is treated as "unavailable".

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    monero: MoneroPrice,
}

#[derive(Debug, Deserialize)]
struct MoneroPrice {
    usd: f64,
}

/// Fetch the current XMR price in USD.
pub async fn fetch_spot_price(http: &Client, url: &str) -> Result<f64> {
    let resp = http
        .get(url)
        .send()
        .await
        .context("CoinGecko request failed")?;

    if !resp.status().is_success() {
        let status = resp.status();
        anyhow::bail!("CoinGecko API error: {status}");
    }

    let data: SimplePriceResponse = resp
        .json()
        .await
        .context("Failed to parse CoinGecko response")?;

    Ok(data.monero.usd)
}
