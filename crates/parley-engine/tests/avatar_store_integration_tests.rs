#![allow(clippy::unwrap_used, clippy::expect_used)]

// The avatar pipeline against the real SQLite and filesystem adapters

mod common;

use chrono::{TimeZone, Utc};
use common::{actor, test_config, RecordingBroadcaster, RecordingEvents, RecordingReporter};
use parley_core::model::{AvatarChange, AvatarUpload, Thread};
use parley_core::ports::{AssetStore, EntityStore};
use parley_core::routes::Routes;
use parley_engine::{update_group_avatar, AvatarDeps, MutationContext};
use parley_store::{FsAssetStore, SqliteThreadStore};
use tempfile::TempDir;

#[test]
fn test_upload_round_trip_through_sqlite_and_disk() {
    let root = TempDir::new().unwrap();
    let config = test_config();
    let routes = Routes::from_config(&config);
    let threads = SqliteThreadStore::open_in_memory().unwrap();
    let assets = FsAssetStore::new(root.path());
    let broadcaster = RecordingBroadcaster::default();
    let events = RecordingEvents::default();
    let reporter = RecordingReporter::default();

    let last_week = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let mut thread = Thread::new_group("t-disk", "Team");
    thread.updated_at = last_week;
    let directory = thread.avatar_directory(&config.storage.threads_disk);
    let custom = assets
        .upload(&AvatarUpload::new("old.png", b"old".to_vec()), &directory)
        .unwrap();
    thread.image = Some(custom.clone());
    threads.insert(&thread).unwrap();

    let deps = AvatarDeps {
        threads: &threads,
        assets: &assets,
        broadcaster: &broadcaster,
        events: &events,
        flags: &config,
        reporter: &reporter,
        config: &config,
        routes: &routes,
    };
    let change = AvatarChange::Upload(AvatarUpload::new("new.webp", b"new".to_vec()));

    let outcome =
        update_group_avatar(&mut thread, change, &MutationContext::new(actor()), &deps).unwrap();

    let stored = threads.get("t-disk").unwrap();
    let new_image = stored.image.clone().unwrap();
    assert!(outcome.changed);
    assert_eq!(thread.image.as_deref(), Some(new_image.as_str()));
    assert!(new_image.ends_with(".webp"));
    assert_eq!(assets.read(&directory.file(&new_image)).unwrap(), b"new");
    assert!(!assets.exists(&directory.file(&custom)));
    assert_eq!(stored.updated_at, last_week);
    assert!(reporter.reports().is_empty());
}

#[test]
fn test_protected_default_survives_on_disk() {
    let root = TempDir::new().unwrap();
    let config = test_config();
    let routes = Routes::from_config(&config);
    let threads = SqliteThreadStore::open_in_memory().unwrap();
    let assets = FsAssetStore::new(root.path());
    let broadcaster = RecordingBroadcaster::default();
    let events = RecordingEvents::default();
    let reporter = RecordingReporter::default();

    let mut thread = Thread::new_group("t-default", "Team").with_image("default1.png");
    threads.insert(&thread).unwrap();
    let default_file = root
        .path()
        .join("messenger/threads/t-default/avatar/default1.png");
    std::fs::create_dir_all(default_file.parent().unwrap()).unwrap();
    std::fs::write(&default_file, b"shared").unwrap();

    let deps = AvatarDeps {
        threads: &threads,
        assets: &assets,
        broadcaster: &broadcaster,
        events: &events,
        flags: &config,
        reporter: &reporter,
        config: &config,
        routes: &routes,
    };

    update_group_avatar(
        &mut thread,
        AvatarChange::Upload(AvatarUpload::new("a.png", vec![1, 2, 3])),
        &MutationContext::new(actor()),
        &deps,
    )
    .unwrap();

    assert!(default_file.exists());
    assert_eq!(events.events().len(), 1);
}
