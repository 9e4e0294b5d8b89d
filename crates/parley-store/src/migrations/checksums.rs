//! Migration checksums
//!
//! Recorded when a migration is applied and compared on every later run so
//! an edited migration file is caught instead of silently skipped.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the migration SQL
pub fn compute_checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    hex::encode(hasher.finalize())
}
