//! Deterministic record ids for saved captures.

use sha2::{Digest, Sha256};

/// Compute a stable id for a capture of `original_url` taken at `timestamp`.
///
/// Saving the same capture twice yields the same id, so the second save
/// replaces the first instead of adding a duplicate row.
pub fn snapshot_id(original_url: &str, timestamp: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(original_url.as_bytes());
    hasher.update(b"\n");
    hasher.update(timestamp.as_bytes());
    hex::encode(hasher.finalize())
}
