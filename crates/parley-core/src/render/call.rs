use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ProviderSummary;
use crate::errors::{ParleyError, Result};
use crate::model::{Call, Thread};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResource {
    pub id: String,
    pub thread_id: String,
    pub active: bool,
    pub owner: ProviderSummary,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

fn unrepresentable(call: &Call, reason: impl Into<String>) -> ParleyError {
    ParleyError::ItemSerialization {
        collection: "calls".to_string(),
        item_id: call.id.clone(),
        reason: reason.into(),
    }
}

/// # Errors
///
/// `ItemSerialization` if the call belongs to another thread or its owner
/// is no longer a participant of `thread`.
pub fn call_resource(call: &Call, thread: &Thread) -> Result<CallResource> {
    if call.thread_id != thread.id {
        return Err(unrepresentable(
            call,
            format!("call belongs to thread {}", call.thread_id),
        ));
    }
    let owner = thread
        .participant(&call.owner_id)
        .ok_or_else(|| unrepresentable(call, format!("owner {} not found", call.owner_id)))?;

    Ok(CallResource {
        id: call.id.clone(),
        thread_id: call.thread_id.clone(),
        active: call.is_active(),
        owner: owner.into(),
        created_at: call.created_at,
        ended_at: call.ended_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Participant;
    use chrono::Utc;

    fn call(owner: &str) -> Call {
        Call {
            id: "c-1".to_string(),
            thread_id: "g-1".to_string(),
            owner_id: owner.to_string(),
            created_at: Utc::now(),
            ended_at: None,
        }
    }

    #[test]
    fn test_call_with_known_owner() {
        let thread = Thread::new_group("g-1", "Team").with_participant(Participant {
            provider_id: "u-1".to_string(),
            provider_alias: "user".to_string(),
            name: "Ada".to_string(),
            admin: true,
        });
        let resource = call_resource(&call("u-1"), &thread).unwrap();
        assert!(resource.active);
        assert_eq!(resource.owner.name, "Ada");
    }

    #[test]
    fn test_call_with_missing_owner_fails() {
        let thread = Thread::new_group("g-1", "Team");
        assert!(matches!(
            call_resource(&call("ghost"), &thread),
            Err(ParleyError::ItemSerialization { .. })
        ));
    }
}
