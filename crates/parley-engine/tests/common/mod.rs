// Shared in-memory collaborators for engine tests
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use parley_core::config::MessengerConfig;
use parley_core::errors::{ExError, ParleyError, Result};
use parley_core::model::{AssetDirectory, AssetPath, AvatarUpload, DomainEvent, Provider, Thread};
use parley_core::pagination::{FetchedBatch, PageRequest};
use parley_core::ports::{
    AssetStore, BroadcastDriver, CollectionSource, EntityStore, ErrorReporter, EventDispatcher,
    PresenceChannel, ThreadUpdate, UpdateOptions,
};
use parley_core::routes::Routes;
use parley_engine::{AvatarDeps, CollectionItem};

/// Config whose protected defaults are `default1.png` .. `default5.png`
pub fn test_config() -> MessengerConfig {
    let mut config = MessengerConfig::default();
    config.defaults.group_avatars = (1..=5).map(|n| format!("default{}.png", n)).collect();
    config
}

pub fn actor() -> Provider {
    Provider::new("u-1", "user", "Ada")
        .with_relation("devices", serde_json::json!([{"id": 1}, {"id": 2}]))
}

// ---------------------------------------------------------------------------
// Entity store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryThreads {
    threads: Mutex<HashMap<String, Thread>>,
    updates: Mutex<Vec<(String, ThreadUpdate, UpdateOptions)>>,
    pub fail_updates: bool,
}

impl InMemoryThreads {
    pub fn with(thread: &Thread) -> Self {
        let store = Self::default();
        store.put(thread);
        store
    }

    pub fn put(&self, thread: &Thread) {
        self.threads
            .lock()
            .unwrap()
            .insert(thread.id.clone(), thread.clone());
    }

    pub fn stored_image(&self, id: &str) -> Option<String> {
        self.threads.lock().unwrap().get(id).and_then(|t| t.image.clone())
    }

    pub fn updates(&self) -> Vec<(String, ThreadUpdate, UpdateOptions)> {
        self.updates.lock().unwrap().clone()
    }
}

impl EntityStore for InMemoryThreads {
    fn get(&self, thread_id: &str) -> Result<Thread> {
        self.threads
            .lock()
            .unwrap()
            .get(thread_id)
            .cloned()
            .ok_or_else(|| ParleyError::ThreadNotFound {
                thread_id: thread_id.to_string(),
            })
    }

    fn update(&self, thread_id: &str, update: &ThreadUpdate, options: UpdateOptions) -> Result<()> {
        if self.fail_updates {
            return Err(ParleyError::Persistence {
                message: "database is locked".to_string(),
            });
        }
        let mut threads = self.threads.lock().unwrap();
        let thread = threads
            .get_mut(thread_id)
            .ok_or_else(|| ParleyError::ThreadNotFound {
                thread_id: thread_id.to_string(),
            })?;
        match update {
            ThreadUpdate::Image(image) => thread.image = Some(image.clone()),
        }
        self.updates
            .lock()
            .unwrap()
            .push((thread_id.to_string(), update.clone(), options));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Asset store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryAssets {
    files: Mutex<BTreeSet<String>>,
    uploads: AtomicUsize,
    deletes: Mutex<Vec<String>>,
    pub fail_uploads: bool,
    pub fail_deletes: bool,
    pub upload_delay: Option<Duration>,
}

impl InMemoryAssets {
    pub fn seed(&self, path: &AssetPath) {
        self.files.lock().unwrap().insert(path.to_string());
    }

    pub fn contains(&self, path: &AssetPath) -> bool {
        self.files.lock().unwrap().contains(&path.to_string())
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

impl AssetStore for InMemoryAssets {
    fn upload(&self, upload: &AvatarUpload, directory: &AssetDirectory) -> Result<String> {
        if let Some(delay) = self.upload_delay {
            std::thread::sleep(delay);
        }
        if self.fail_uploads {
            return Err(ParleyError::Storage {
                op: "upload".to_string(),
                message: "disk full".to_string(),
            });
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        let name = format!(
            "img_{}.{}",
            n,
            upload.extension().unwrap_or_else(|| "bin".to_string())
        );
        self.seed(&directory.file(&name));
        Ok(name)
    }

    fn delete(&self, path: &AssetPath) -> Result<()> {
        self.deletes.lock().unwrap().push(path.to_string());
        if self.fail_deletes {
            return Err(ParleyError::Storage {
                op: "delete".to_string(),
                message: "permission denied".to_string(),
            });
        }
        self.files.lock().unwrap().remove(&path.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Delivery and reporting
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingBroadcaster {
    sent: Mutex<Vec<(String, String, serde_json::Value)>>,
    pub fail: bool,
}

impl RecordingBroadcaster {
    pub fn sent(&self) -> Vec<(String, String, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }
}

impl BroadcastDriver for RecordingBroadcaster {
    fn send_to_presence(
        &self,
        channel: &PresenceChannel,
        event_name: &str,
        payload: &serde_json::Value,
    ) -> Result<()> {
        if self.fail {
            return Err(ParleyError::DeliveryFailed {
                target: channel.as_str().to_string(),
                message: "socket closed".to_string(),
            });
        }
        self.sent.lock().unwrap().push((
            channel.as_str().to_string(),
            event_name.to_string(),
            payload.clone(),
        ));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<DomainEvent>>,
    pub fail: bool,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventDispatcher for RecordingEvents {
    fn dispatch(&self, event: DomainEvent) -> Result<()> {
        if self.fail {
            return Err(ParleyError::DeliveryFailed {
                target: event.name().to_string(),
                message: "queue unavailable".to_string(),
            });
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<ExError>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<ExError> {
        self.reports.lock().unwrap().clone()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.reports().iter().map(|r| r.code()).collect()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &ExError) {
        self.reports.lock().unwrap().push(error.clone());
    }
}

// ---------------------------------------------------------------------------
// Avatar pipeline harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub threads: InMemoryThreads,
    pub assets: InMemoryAssets,
    pub broadcaster: RecordingBroadcaster,
    pub events: RecordingEvents,
    pub reporter: RecordingReporter,
    pub config: MessengerConfig,
    pub routes: Routes,
}

impl Harness {
    /// Harness holding `thread`, with its current image present in storage
    pub fn new(thread: &Thread) -> Self {
        let config = test_config();
        let harness = Self {
            threads: InMemoryThreads::with(thread),
            assets: InMemoryAssets::default(),
            broadcaster: RecordingBroadcaster::default(),
            events: RecordingEvents::default(),
            reporter: RecordingReporter::default(),
            routes: Routes::from_config(&config),
            config,
        };
        if let Some(image) = &thread.image {
            harness.assets.seed(&harness.avatar_path(thread, image));
        }
        harness
    }

    pub fn avatar_path(&self, thread: &Thread, image: &str) -> AssetPath {
        thread
            .avatar_directory(&self.config.storage.threads_disk)
            .file(image)
    }

    pub fn deps(&self) -> AvatarDeps<'_> {
        AvatarDeps {
            threads: &self.threads,
            assets: &self.assets,
            broadcaster: &self.broadcaster,
            events: &self.events,
            flags: &self.config,
            reporter: &self.reporter,
            config: &self.config,
            routes: &self.routes,
        }
    }
}

// ---------------------------------------------------------------------------
// Collection source
// ---------------------------------------------------------------------------

/// Ordered in-memory source; the cursor names the last item of the previous page
pub struct VecSource<T> {
    items: Vec<T>,
    count_calls: AtomicUsize,
    pub fail_fetch: bool,
}

impl<T> VecSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            count_calls: AtomicUsize::new(0),
            fail_fetch: false,
        }
    }

    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }
}

impl<T: CollectionItem + Clone> CollectionSource<T> for VecSource<T> {
    fn fetch(&self, request: &PageRequest, limit: usize) -> Result<FetchedBatch<T>> {
        if self.fail_fetch {
            return Err(ParleyError::Persistence {
                message: "connection reset".to_string(),
            });
        }
        let start = match &request.cursor {
            Some(cursor) => {
                let id = cursor.item_id()?;
                self.items
                    .iter()
                    .position(|i| i.item_id() == id)
                    .map(|p| p + 1)
                    .ok_or(ParleyError::ThreadNotFound { thread_id: id })?
            }
            None => 0,
        };
        let rest = self.items[start..].to_vec();
        if !request.paginate {
            return Ok(FetchedBatch::complete(rest));
        }
        let raw = rest.into_iter().take(limit + 1).collect();
        Ok(FetchedBatch::from_overshot(raw, limit))
    }

    fn count(&self) -> Result<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.len() as u64)
    }
}
