use serde::Serialize;

use super::{Provider, Thread};

/// Domain events handed to listeners, loggers and webhooks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A group thread's avatar changed
    ThreadAvatar {
        provider: Provider,
        thread: Thread,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::ThreadAvatar { .. } => "thread_avatar",
        }
    }
}
