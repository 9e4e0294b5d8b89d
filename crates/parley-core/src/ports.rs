//! Collaborator contracts consumed by the mutation pipeline and collections
//!
//! Persistence, file storage, realtime transport and event listeners live
//! outside the core. The engine only talks to them through these traits,
//! which are injected per call the same way commit policies are.

use crate::config::MessengerConfig;
use crate::core_types::schema::EVENT_BEST_EFFORT_FAILURE;
use crate::errors::{ExError, Result};
use crate::model::{AssetDirectory, AssetPath, AvatarUpload, DomainEvent, Thread};
use crate::pagination::{FetchedBatch, PageRequest};

/// Options for an entity update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOptions {
    /// Leave `updated_at` untouched (metadata changes, not content edits)
    pub skip_audit: bool,
}

/// Field-level change persisted by [`EntityStore::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadUpdate {
    Image(String),
}

/// Persistence for threads
///
/// Concurrent updates to the same thread are arbitrated here, not by the
/// caller.
pub trait EntityStore: Send + Sync {
    /// # Errors
    ///
    /// `ThreadNotFound` if no thread has this id, `Persistence` on backend failure.
    fn get(&self, thread_id: &str) -> Result<Thread>;

    /// # Errors
    ///
    /// `ThreadNotFound` if no thread has this id, `Persistence` on backend failure.
    fn update(&self, thread_id: &str, update: &ThreadUpdate, options: UpdateOptions) -> Result<()>;
}

/// Raw file storage for thread assets
pub trait AssetStore: Send + Sync {
    /// Store `upload` inside `directory` and return the generated file name.
    ///
    /// # Errors
    ///
    /// `Storage` if the file cannot be written.
    fn upload(&self, upload: &AvatarUpload, directory: &AssetDirectory) -> Result<String>;

    /// Delete the file at `path`. Deleting a missing file is not an error.
    ///
    /// # Errors
    ///
    /// `Storage` if an existing file cannot be removed.
    fn delete(&self, path: &AssetPath) -> Result<()>;
}

/// Realtime channel scoped to the participants currently present in a thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceChannel(String);

impl PresenceChannel {
    pub fn for_thread(thread_id: &str) -> Self {
        Self(format!("presence-messenger.thread.{}", thread_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Realtime delivery. Fire-and-forget from the caller's point of view.
pub trait BroadcastDriver: Send + Sync {
    /// # Errors
    ///
    /// `DeliveryFailed` if the transport refused the payload.
    fn send_to_presence(
        &self,
        channel: &PresenceChannel,
        event_name: &str,
        payload: &serde_json::Value,
    ) -> Result<()>;
}

/// Domain event sink. Fire-and-forget from the caller's point of view.
pub trait EventDispatcher: Send + Sync {
    /// # Errors
    ///
    /// `DeliveryFailed` if the event could not be queued.
    fn dispatch(&self, event: DomainEvent) -> Result<()>;
}

/// Optional features that can be switched off by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    ThreadAvatarUpload,
}

pub trait FeatureFlags: Send + Sync {
    fn is_enabled(&self, feature: Feature) -> bool;
}

impl FeatureFlags for MessengerConfig {
    fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::ThreadAvatarUpload => self.files.avatar_uploads,
        }
    }
}

/// Out-of-band sink for best-effort failures
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &ExError);
}

/// Reports best-effort failures as structured error logs
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, error: &ExError) {
        tracing::error!(
            component = module_path!(),
            op = error.op().unwrap_or("unknown"),
            event = EVENT_BEST_EFFORT_FAILURE,
            err.kind = ?error.kind(),
            err.code = error.code(),
            entity_id = error.entity_id().unwrap_or_default(),
            request_id = error.request_id().map(|r| r.as_str()).unwrap_or_default(),
            detail = %error,
        );
    }
}

/// Broadcast driver that only logs what it would have sent
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBroadcastDriver;

impl BroadcastDriver for LoggingBroadcastDriver {
    fn send_to_presence(
        &self,
        channel: &PresenceChannel,
        event_name: &str,
        payload: &serde_json::Value,
    ) -> Result<()> {
        tracing::info!(
            channel = channel.as_str(),
            broadcast = event_name,
            payload = %payload,
            "broadcast"
        );
        Ok(())
    }
}

/// Event dispatcher that only logs the event it received
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventDispatcher;

impl EventDispatcher for LoggingEventDispatcher {
    fn dispatch(&self, event: DomainEvent) -> Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(domain_event = event.name(), payload = %payload, "domain event");
        Ok(())
    }
}

/// Ordered source of collection items
pub trait CollectionSource<T> {
    /// Fetch up to `limit` items after the request's cursor, plus whether
    /// more remain.
    ///
    /// # Errors
    ///
    /// Any backend failure. Fetch failures fail the whole request.
    fn fetch(&self, request: &PageRequest, limit: usize) -> Result<FetchedBatch<T>>;

    /// Total matching items across all pages.
    ///
    /// # Errors
    ///
    /// Any backend failure.
    fn count(&self) -> Result<u64>;
}
