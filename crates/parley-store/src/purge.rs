//! Purge of soft-deleted text messages
//!
//! Text messages stay in the trash for a grace period after deletion, then
//! are removed for good. Non-text messages own files and are purged by
//! their own jobs.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use crate::errors::{from_rusqlite, Result};

/// Message type code of a plain text message
pub const TEXT_MESSAGE: i64 = 0;

/// Permanently delete text messages soft-deleted at least `days` before
/// `now`. Returns how many rows were removed.
pub fn purge_messages(conn: &Connection, days: u32, now: DateTime<Utc>) -> Result<usize> {
    let cutoff = (now - Duration::days(i64::from(days))).timestamp_millis();

    let purged = conn
        .execute(
            "DELETE FROM messages \
             WHERE type = ?1 AND deleted_at IS NOT NULL AND deleted_at <= ?2",
            params![TEXT_MESSAGE, cutoff],
        )
        .map_err(from_rusqlite)?;

    tracing::info!(purged, days, cutoff, "purged trashed messages");
    Ok(purged)
}
