//! Pure projections of domain entities into API and broadcast payloads
//!
//! Every function here takes borrowed snapshots and performs no I/O, so
//! two projections of the same `&Thread` always describe the same state.

pub mod call;
pub mod thread;
pub mod thread_settings;

use serde::Serialize;

use crate::model::{Participant, Thread};
use crate::routes::Routes;

pub use call::{call_resource, CallResource};
pub use thread::{thread_resource, ThreadResource};
pub use thread_settings::{
    thread_settings_broadcast, thread_settings_resource, ThreadSettingsBroadcast,
    ThreadSettingsResource,
};

/// Avatar URLs in the three served sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarLinks {
    pub sm: String,
    pub md: String,
    pub lg: String,
}

impl AvatarLinks {
    /// `None` when the thread has no avatar at all
    pub fn for_thread(thread: &Thread, routes: &Routes) -> Option<Self> {
        let image = thread.image.as_deref()?;
        Some(Self {
            sm: routes.thread_avatar(&thread.id, "sm", image),
            md: routes.thread_avatar(&thread.id, "md", image),
            lg: routes.thread_avatar(&thread.id, "lg", image),
        })
    }
}

/// Minimal identity of a provider as shown to other participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSummary {
    pub provider_id: String,
    pub provider_alias: String,
    pub name: String,
}

impl From<&Participant> for ProviderSummary {
    fn from(p: &Participant) -> Self {
        Self {
            provider_id: p.provider_id.clone(),
            provider_alias: p.provider_alias.clone(),
            name: p.name.clone(),
        }
    }
}
