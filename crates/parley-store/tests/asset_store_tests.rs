// Integration tests for FsAssetStore

use parley_core::model::{AvatarUpload, Thread};
use parley_core::ports::AssetStore;
use parley_store::FsAssetStore;
use tempfile::TempDir;

fn setup() -> (TempDir, FsAssetStore) {
    let dir = TempDir::new().expect("Failed to create temp asset root");
    let store = FsAssetStore::new(dir.path());
    (dir, store)
}

#[test]
fn test_upload_writes_into_thread_avatar_directory() {
    let (dir, store) = setup();
    let thread = Thread::new_group("t-1", "Team");
    let directory = thread.avatar_directory("messenger");

    let name = store
        .upload(&AvatarUpload::new("face.png", b"png-bytes".to_vec()), &directory)
        .unwrap();

    assert!(name.starts_with("img_") && name.ends_with(".png"));
    let on_disk = dir
        .path()
        .join("messenger/threads/t-1/avatar")
        .join(&name);
    assert_eq!(std::fs::read(on_disk).unwrap(), b"png-bytes");
    assert_eq!(store.read(&directory.file(&name)).unwrap(), b"png-bytes");
}

#[test]
fn test_uploads_get_distinct_names() {
    let (_dir, store) = setup();
    let directory = Thread::new_group("t-1", "Team").avatar_directory("messenger");
    let upload = AvatarUpload::new("a.png", vec![1, 2, 3]);

    let first = store.upload(&upload, &directory).unwrap();
    let second = store.upload(&upload, &directory).unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_delete_removes_file() {
    let (_dir, store) = setup();
    let directory = Thread::new_group("t-1", "Team").avatar_directory("messenger");
    let name = store
        .upload(&AvatarUpload::new("a.gif", vec![9]), &directory)
        .unwrap();
    let path = directory.file(&name);

    assert!(store.exists(&path));
    store.delete(&path).unwrap();
    assert!(!store.exists(&path));
}

#[test]
fn test_delete_missing_file_is_ok() {
    let (_dir, store) = setup();
    let path = Thread::new_group("t-1", "Team")
        .avatar_directory("messenger")
        .file("img_missing.png");

    assert!(store.delete(&path).is_ok());
}
