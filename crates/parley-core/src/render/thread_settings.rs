use serde::Serialize;

use super::{AvatarLinks, ProviderSummary};
use crate::model::{Provider, Thread};
use crate::routes::Routes;

/// Full settings representation returned to the requesting client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadSettingsResource {
    pub name: String,
    pub avatar: Option<AvatarLinks>,
    pub add_participants: bool,
    pub invitations: bool,
    pub calling: bool,
    pub messaging: bool,
    pub knocks: bool,
}

/// Compact representation pushed to participants present in the thread
///
/// Omits the settings flags; present participants already hold them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadSettingsBroadcast {
    pub thread_id: String,
    pub name: String,
    pub avatar: Option<AvatarLinks>,
    pub sender: ProviderSummary,
}

pub fn thread_settings_resource(thread: &Thread, routes: &Routes) -> ThreadSettingsResource {
    ThreadSettingsResource {
        name: thread.subject.clone().unwrap_or_default(),
        avatar: AvatarLinks::for_thread(thread, routes),
        add_participants: thread.add_participants,
        invitations: thread.invitations,
        calling: thread.calling,
        messaging: thread.messaging,
        knocks: thread.knocks,
    }
}

pub fn thread_settings_broadcast(
    thread: &Thread,
    sender: &Provider,
    routes: &Routes,
) -> ThreadSettingsBroadcast {
    ThreadSettingsBroadcast {
        thread_id: thread.id.clone(),
        name: thread.subject.clone().unwrap_or_default(),
        avatar: AvatarLinks::for_thread(thread, routes),
        sender: ProviderSummary {
            provider_id: sender.id.clone(),
            provider_alias: sender.alias.clone(),
            name: sender.name.clone(),
        },
    }
}
