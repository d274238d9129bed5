//! Snapshot persistence.
//!
//! Renders a snapshot to JSON or to a Haskell record literal and writes
//! it atomically: the whole payload is serialized in memory, written to
//! a sibling `.tmp` file and renamed over the destination, so a
//! concurrent reader sees either the old file or the new one, never a
//! partial write.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::Snapshot;

/// Output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Self-describing JSON with the stable camelCase field names.
    Json,
    /// A `JetskiTrackerData { … }` record literal for direct inclusion
    /// in the Haskell consumer.
    Haskell,
}

/// Serialize `snapshot` and write it to `path`.
pub fn save(snapshot: &Snapshot, path: &Path, format: Format) -> Result<()> {
    let payload = match format {
        Format::Json => serde_json::to_string_pretty(snapshot)
            .context("Failed to serialise snapshot to JSON")?,
        Format::Haskell => render_haskell(snapshot),
    };

    let tmp = tmp_path(path);
    std::fs::write(&tmp, &payload)
        .with_context(|| format!("Failed to write snapshot to {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move snapshot into place at {}", path.display()))?;

    debug!(path = %path.display(), ?format, "Snapshot saved");
    Ok(())
}

/// Parse a snapshot back from a JSON file. The Haskell form is
/// write-only; only the consumer's compiler reads it.
pub fn load_json(path: &Path) -> Result<Snapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot from {}", path.display()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Render the record literal the Haskell side splices in verbatim. The
/// `jt…` field names and `{:?}` float formatting (`167.0`, not `167`)
/// match what its record type expects.
fn render_haskell(s: &Snapshot) -> String {
    let pools = s
        .pool_distribution
        .iter()
        .map(|(name, share)| format!("(\"{name}\", {share:?})"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    let _ = writeln!(out, "JetskiTrackerData {{");
    let _ = writeln!(out, "  jtNetworkHashrate = {:?},", s.network_hashrate);
    let _ = writeln!(out, "  jtQubicHashrate = {:?},", s.target_actor_hashrate);
    let _ = writeln!(out, "  jtOrphanedBlocks = {},", s.orphaned_blocks_24h);
    let _ = writeln!(out, "  jtBlockWithholdingScore = {:?},", s.withholding_score);
    let _ = writeln!(out, "  jtPoolDistribution = [{pools}],");
    let _ = writeln!(out, "  jtLastReorgDepth = {},", s.last_reorg_depth);
    let _ = writeln!(out, "  jtTimestamp = {:?},", s.captured_at);
    let _ = writeln!(out, "  jtXMRPrice = {:?}", s.price);
    out.push('}');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        let snap = Snapshot::sample();

        save(&snap, &path, Format::Json).unwrap();
        let loaded = load_json(&path).unwrap();

        assert!((loaded.network_hashrate - snap.network_hashrate).abs() < 1e-9);
        assert!((loaded.target_actor_hashrate - snap.target_actor_hashrate).abs() < 1e-9);
        assert_eq!(loaded.orphaned_blocks_24h, snap.orphaned_blocks_24h);
        assert!((loaded.withholding_score - snap.withholding_score).abs() < 1e-9);
        assert_eq!(loaded.pool_distribution, snap.pool_distribution);
        assert_eq!(loaded.last_reorg_depth, snap.last_reorg_depth);
        assert!((loaded.captured_at - snap.captured_at).abs() < 1e-6);
        assert!((loaded.price - snap.price).abs() < 1e-9);
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        save(&Snapshot::sample(), &path, Format::Json).unwrap();

        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_overwrite_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");

        let mut snap = Snapshot::sample();
        save(&snap, &path, Format::Json).unwrap();

        snap.orphaned_blocks_24h = 18;
        save(&snap, &path, Format::Json).unwrap();

        let loaded = load_json(&path).unwrap();
        assert_eq!(loaded.orphaned_blocks_24h, 18);
    }

    #[test]
    fn test_haskell_record_shape() {
        let rendered = render_haskell(&Snapshot::sample());

        assert!(rendered.starts_with("JetskiTrackerData {"));
        assert!(rendered.ends_with('}'));
        assert!(rendered.contains("jtNetworkHashrate = 4.97,"));
        assert!(rendered.contains("jtQubicHashrate = 0.7455,"));
        assert!(rendered.contains("jtOrphanedBlocks = 3,"));
        assert!(rendered.contains("jtPoolDistribution = [(\"Qubic\", 0.15), (\"SupportXMR\", 0.18)],"));
        assert!(rendered.contains("jtLastReorgDepth = 0,"));
        // Integral floats keep a trailing .0 so the literal stays a Double.
        assert!(rendered.contains("jtXMRPrice = 167.0"));
    }

    #[test]
    fn test_save_to_bad_path_errors() {
        let snap = Snapshot::sample();
        let path = Path::new("/no/such/directory/snap.json");
        assert!(save(&snap, path, Format::Json).is_err());
    }
}
