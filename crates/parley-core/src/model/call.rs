use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A call placed inside a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: String,
    pub thread_id: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Call {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}
