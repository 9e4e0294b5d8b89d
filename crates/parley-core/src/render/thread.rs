use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AvatarLinks, ProviderSummary};
use crate::errors::{ParleyError, Result};
use crate::model::{Provider, Thread};
use crate::routes::Routes;

/// Thread as listed in thread collections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadResource {
    pub id: String,
    #[serde(rename = "type")]
    pub type_code: u8,
    pub type_verbose: &'static str,
    pub group: bool,
    pub name: String,
    pub avatar: Option<AvatarLinks>,
    pub recipient: Option<ProviderSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project a thread as seen by `viewer`.
///
/// # Errors
///
/// `ItemSerialization` when a private thread has no participant other than
/// the viewer (a stale or half-deleted membership).
pub fn thread_resource(thread: &Thread, viewer: &Provider, routes: &Routes) -> Result<ThreadResource> {
    let recipient = if thread.is_private() {
        let other = thread
            .recipient_for(&viewer.id)
            .ok_or_else(|| ParleyError::ItemSerialization {
                collection: "threads".to_string(),
                item_id: thread.id.clone(),
                reason: "private thread has no recipient".to_string(),
            })?;
        Some(ProviderSummary::from(other))
    } else {
        None
    };

    let name = match &recipient {
        Some(r) => r.name.clone(),
        None => thread.subject.clone().unwrap_or_default(),
    };

    Ok(ThreadResource {
        id: thread.id.clone(),
        type_code: thread.thread_type.code(),
        type_verbose: thread.thread_type.verbose(),
        group: thread.is_group(),
        name,
        avatar: AvatarLinks::for_thread(thread, routes),
        recipient,
        created_at: thread.created_at,
        updated_at: thread.updated_at,
    })
}
