//! Row <-> model conversion for the `threads` table

use crate::errors::{corrupt_row, Result};
use chrono::{DateTime, Utc};
use parley_core::model::{Participant, Thread, ThreadType};
use rusqlite::Row;

/// Column list matching [`ThreadRow::from_row`]
pub const THREAD_COLUMNS: &str = "id, type, subject, image, add_participants, invitations, \
     calling, messaging, knocks, participants, created_at, updated_at";

/// A `threads` row as stored, before validation
#[derive(Debug, Clone)]
pub struct ThreadRow {
    pub id: String,
    pub type_code: i64,
    pub subject: Option<String>,
    pub image: Option<String>,
    pub add_participants: bool,
    pub invitations: bool,
    pub calling: bool,
    pub messaging: bool,
    pub knocks: bool,
    pub participants: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ThreadRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            type_code: row.get(1)?,
            subject: row.get(2)?,
            image: row.get(3)?,
            add_participants: row.get(4)?,
            invitations: row.get(5)?,
            calling: row.get(6)?,
            messaging: row.get(7)?,
            knocks: row.get(8)?,
            participants: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    /// Validate and convert into a [`Thread`].
    ///
    /// # Errors
    ///
    /// `Persistence` if the type code, participants JSON or a timestamp is
    /// out of range.
    pub fn hydrate(self) -> Result<Thread> {
        let thread_type = u8::try_from(self.type_code)
            .ok()
            .and_then(ThreadType::from_code)
            .ok_or_else(|| {
                corrupt_row("threads", &self.id, format!("type {}", self.type_code))
            })?;
        let participants: Vec<Participant> = serde_json::from_str(&self.participants)
            .map_err(|e| corrupt_row("threads", &self.id, e))?;
        let created_at = millis_to_datetime(self.created_at)
            .ok_or_else(|| corrupt_row("threads", &self.id, "created_at"))?;
        let updated_at = millis_to_datetime(self.updated_at)
            .ok_or_else(|| corrupt_row("threads", &self.id, "updated_at"))?;

        Ok(Thread {
            id: self.id,
            thread_type,
            subject: self.subject,
            image: self.image,
            add_participants: self.add_participants,
            invitations: self.invitations,
            calling: self.calling,
            messaging: self.messaging,
            knocks: self.knocks,
            participants,
            created_at,
            updated_at,
        })
    }
}

pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(type_code: i64, participants: &str) -> ThreadRow {
        ThreadRow {
            id: "t-1".to_string(),
            type_code,
            subject: Some("Team".to_string()),
            image: Some("1.png".to_string()),
            add_participants: true,
            invitations: false,
            calling: true,
            messaging: true,
            knocks: false,
            participants: participants.to_string(),
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_360_000,
        }
    }

    #[test]
    fn test_hydrate_group_row() {
        let thread = row(2, "[]").hydrate().unwrap();
        assert!(thread.is_group());
        assert_eq!(thread.image.as_deref(), Some("1.png"));
        assert!(!thread.invitations);
        assert_eq!(thread.updated_at.timestamp_millis(), 1_700_000_360_000);
    }

    #[test]
    fn test_unknown_type_is_corrupt() {
        assert!(row(7, "[]").hydrate().is_err());
    }

    #[test]
    fn test_bad_participants_json_is_corrupt() {
        assert!(row(1, "{not json").hydrate().is_err());
    }
}
