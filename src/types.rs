//! Shared types for the tracker.
//!
//! `Snapshot` is the single entity the whole pipeline produces: one
//! immutable, fully-resolved capture of all tracked metrics at a point
//! in time. Sources, scoring, persistence and the scheduler all depend
//! on these types without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named pool's hashrate share of the network (0.0–1.0).
pub type PoolShare = (String, f64);

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One capture of the Monero network's withholding-relevant metrics.
///
/// Immutable once built. Serialized field names are the stable camelCase
/// contract downstream tools parse (`networkHashrate`, `capturedAt`, …).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Network hashrate in GH/s.
    pub network_hashrate: f64,
    /// The watched pool's absolute hashrate in GH/s, derived from its
    /// distribution share. Zero when the pool is absent.
    pub target_actor_hashrate: f64,
    /// Orphaned blocks observed in the last 24 hours.
    pub orphaned_blocks_24h: u32,
    /// Composite block-withholding threat score, clamped to [0, 1].
    pub withholding_score: f64,
    /// Pool hashrate distribution in source order. Never empty: a failed
    /// fetch substitutes the fixed baseline distribution.
    pub pool_distribution: Vec<PoolShare>,
    /// Depth of the most recent chain reorganisation (0 if none).
    pub last_reorg_depth: u32,
    /// Capture time as POSIX seconds.
    pub captured_at: f64,
    /// XMR spot price in USD.
    pub price: f64,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "net {:.2} GH/s | target {:.2} GH/s | orphans {} | reorg {} | score {:.4} | ${:.2}",
            self.network_hashrate,
            self.target_actor_hashrate,
            self.orphaned_blocks_24h,
            self.last_reorg_depth,
            self.withholding_score,
            self.price,
        )
    }
}

impl Snapshot {
    /// Helper to build a test snapshot with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        Snapshot {
            network_hashrate: 4.97,
            target_actor_hashrate: 0.7455,
            orphaned_blocks_24h: 3,
            withholding_score: 0.1119,
            pool_distribution: vec![
                ("Qubic".to_string(), 0.15),
                ("SupportXMR".to_string(), 0.18),
            ],
            last_reorg_depth: 0,
            captured_at: 1_758_000_000.0,
            price: 167.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Threat tier
// ---------------------------------------------------------------------------

/// Coarse threat classification derived purely from the withholding score.
///
/// The thresholds are part of the observable contract: downstream alerting
/// keys off these labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatTier {
    Low,
    Moderate,
    High,
    Critical,
}

impl ThreatTier {
    /// Classify a withholding score.
    pub fn from_score(score: f64) -> Self {
        if score > 0.85 {
            ThreatTier::Critical
        } else if score > 0.6 {
            ThreatTier::High
        } else if score > 0.3 {
            ThreatTier::Moderate
        } else {
            ThreatTier::Low
        }
    }
}

impl fmt::Display for ThreatTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThreatTier::Low => "LOW",
            ThreatTier::Moderate => "MODERATE",
            ThreatTier::High => "HIGH",
            ThreatTier::Critical => "CRITICAL",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(ThreatTier::from_score(0.0), ThreatTier::Low);
        assert_eq!(ThreatTier::from_score(0.3), ThreatTier::Low);
        assert_eq!(ThreatTier::from_score(0.31), ThreatTier::Moderate);
        assert_eq!(ThreatTier::from_score(0.6), ThreatTier::Moderate);
        assert_eq!(ThreatTier::from_score(0.61), ThreatTier::High);
        // 0.85 exactly is still HIGH; CRITICAL requires strictly greater.
        assert_eq!(ThreatTier::from_score(0.85), ThreatTier::High);
        assert_eq!(ThreatTier::from_score(0.86), ThreatTier::Critical);
        assert_eq!(ThreatTier::from_score(1.0), ThreatTier::Critical);
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(ThreatTier::Critical.to_string(), "CRITICAL");
        assert_eq!(ThreatTier::Low.to_string(), "LOW");
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let json = serde_json::to_value(Snapshot::sample()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "networkHashrate",
            "targetActorHashrate",
            "orphanedBlocks24h",
            "withholdingScore",
            "poolDistribution",
            "lastReorgDepth",
            "capturedAt",
            "price",
        ] {
            assert!(obj.contains_key(key), "missing field {key}");
        }
        assert_eq!(obj.len(), 8);
    }

    #[test]
    fn test_pool_distribution_serializes_as_pairs() {
        let json = serde_json::to_value(Snapshot::sample()).unwrap();
        let pools = json["poolDistribution"].as_array().unwrap();
        assert_eq!(pools[0][0], "Qubic");
        assert!((pools[0][1].as_f64().unwrap() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_display() {
        let s = Snapshot::sample().to_string();
        assert!(s.contains("4.97 GH/s"));
        assert!(s.contains("$167.00"));
    }
}
