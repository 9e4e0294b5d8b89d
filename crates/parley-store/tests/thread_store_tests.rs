// Integration tests for SqliteThreadStore: entity access and listings

use chrono::{Duration, TimeZone, Utc};
use parley_core::errors::ParleyError;
use parley_core::model::{Participant, Thread};
use parley_core::pagination::{Cursor, Loaded, PageRequest};
use parley_core::ports::{CollectionSource, EntityStore, ThreadUpdate, UpdateOptions};
use parley_store::SqliteThreadStore;

fn at_minute(minute: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
}

fn group(id: &str, minute: i64) -> Thread {
    let mut thread = Thread::new_group(id, format!("Group {}", id)).with_image("1.png");
    thread.created_at = at_minute(minute);
    thread.updated_at = at_minute(minute);
    thread
}

fn private(id: &str, minute: i64) -> Thread {
    let mut thread = Thread::new_private(id).with_participant(Participant {
        provider_id: "u-1".to_string(),
        provider_alias: "user".to_string(),
        name: "Ada".to_string(),
        admin: false,
    });
    thread.created_at = at_minute(minute);
    thread.updated_at = at_minute(minute);
    thread
}

fn seeded_store() -> SqliteThreadStore {
    let store = SqliteThreadStore::open_in_memory().unwrap();
    // Minutes chosen so updated_at order differs from id order
    store.insert(&group("g-1", 30)).unwrap();
    store.insert(&group("g-2", 10)).unwrap();
    store.insert(&private("p-1", 20)).unwrap();
    store.insert(&group("g-3", 40)).unwrap();
    store.insert(&private("p-2", 50)).unwrap();
    store
}

fn ids(threads: &[Loaded<Thread>]) -> Vec<&str> {
    threads.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn test_get_round_trips_thread() {
    let store = seeded_store();

    let thread = store.get("p-1").unwrap();

    assert!(thread.is_private());
    assert_eq!(thread.participants.len(), 1);
    assert_eq!(thread.updated_at, at_minute(20));
}

#[test]
fn test_get_missing_thread() {
    let store = seeded_store();
    let err = store.get("nope").unwrap_err();
    assert!(matches!(err, ParleyError::ThreadNotFound { .. }));
}

#[test]
fn test_update_with_skip_audit_keeps_updated_at() {
    let store = seeded_store();

    store
        .update(
            "g-1",
            &ThreadUpdate::Image("img_new.png".to_string()),
            UpdateOptions { skip_audit: true },
        )
        .unwrap();

    let thread = store.get("g-1").unwrap();
    assert_eq!(thread.image.as_deref(), Some("img_new.png"));
    assert_eq!(thread.updated_at, at_minute(30));
}

#[test]
fn test_update_without_skip_audit_touches_updated_at() {
    let store = seeded_store();

    store
        .update(
            "g-1",
            &ThreadUpdate::Image("2.png".to_string()),
            UpdateOptions::default(),
        )
        .unwrap();

    assert!(store.get("g-1").unwrap().updated_at > at_minute(30));
}

#[test]
fn test_update_missing_thread() {
    let store = seeded_store();
    let err = store
        .update(
            "nope",
            &ThreadUpdate::Image("2.png".to_string()),
            UpdateOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, ParleyError::ThreadNotFound { .. }));
}

#[test]
fn test_listing_is_most_recent_first_and_paginates() {
    let store = seeded_store();
    let all = store.collection(None);

    let first = all.fetch(&PageRequest::index(), 2).unwrap();
    assert_eq!(ids(&first.items), vec!["p-2", "g-3"]);
    assert!(first.has_more);

    let cursor = Cursor::after(&first.items[1].id);
    let second = all.fetch(&PageRequest::after(cursor), 2).unwrap();
    assert_eq!(ids(&second.items), vec!["g-1", "p-1"]);
    assert!(second.has_more);

    let cursor = Cursor::after(&second.items[1].id);
    let last = all.fetch(&PageRequest::after(cursor), 2).unwrap();
    assert_eq!(ids(&last.items), vec!["g-2"]);
    assert!(!last.has_more);
}

#[test]
fn test_type_filter_and_count() {
    let store = seeded_store();

    let groups = store.collection(Some(parley_core::model::ThreadType::Group));
    let privates = store.collection(Some(parley_core::model::ThreadType::Private));

    assert_eq!(groups.count().unwrap(), 3);
    assert_eq!(privates.count().unwrap(), 2);
    assert_eq!(store.collection(None).count().unwrap(), 5);

    let batch = groups.fetch(&PageRequest::index(), 10).unwrap();
    assert_eq!(ids(&batch.items), vec!["g-3", "g-1", "g-2"]);
    assert!(!batch.has_more);
}

#[test]
fn test_exhaustive_fetch_ignores_limit() {
    let store = seeded_store();
    let batch = store
        .collection(None)
        .fetch(&PageRequest::exhaustive(), 1)
        .unwrap();
    assert_eq!(batch.items.len(), 5);
    assert!(!batch.has_more);
}

#[test]
fn test_cursor_to_missing_thread_fails() {
    let store = seeded_store();
    let err = store
        .collection(None)
        .fetch(&PageRequest::after(Cursor::after("gone")), 2)
        .unwrap_err();
    assert!(matches!(err, ParleyError::ThreadNotFound { .. }));
}

#[test]
fn test_corrupt_row_fails_only_its_item() {
    let store = seeded_store();
    store
        .with_connection(|conn| {
            conn.execute(
                "UPDATE threads SET participants = 'not json' WHERE id = 'g-1'",
                [],
            )
            .map_err(parley_store::errors::from_rusqlite)
        })
        .unwrap();

    let batch = store
        .collection(None)
        .fetch(&PageRequest::index(), 10)
        .unwrap();

    assert_eq!(ids(&batch.items), vec!["p-2", "g-3", "g-1", "p-1", "g-2"]);
    let broken: Vec<&str> = batch
        .items
        .iter()
        .filter(|loaded| loaded.item.is_err())
        .map(|loaded| loaded.id.as_str())
        .collect();
    assert_eq!(broken, vec!["g-1"]);
    assert!(matches!(
        batch.items[2].model(),
        Err(ParleyError::Persistence { .. })
    ));
    assert_eq!(batch.items[3].model().unwrap().id, "p-1");
}
