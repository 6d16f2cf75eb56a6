use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;
use zonesync_sync::{SyncError, SyncOptions};

use crate::common::{synchronizer, transfer_config, FakeStore};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_upload_skips_excluded_extensions() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "x.txt", "text");
    write(dir.path(), "x.md", "# notes");
    let store = FakeStore::new();
    let sync = synchronizer(&store, &transfer_config(4, 0));

    let report = sync
        .upload_folder(dir.path(), "dest", &SyncOptions::new().exclude(".md"))
        .await
        .unwrap();

    assert_eq!(store.keys(), vec!["dest/x.txt"]);
    assert_eq!(report.transferred, vec![dir.path().join("x.txt")]);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_upload_recursive_preserves_structure() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "a");
    write(dir.path(), "sub/b.txt", "b");
    write(dir.path(), "sub/deep/c.txt", "c");
    let store = FakeStore::new();
    let sync = synchronizer(&store, &transfer_config(2, 0));

    let report = sync
        .upload_folder(dir.path(), "/backup/", &SyncOptions::new().recursive(true))
        .await
        .unwrap();

    assert_eq!(
        store.keys(),
        vec!["backup/a.txt", "backup/sub/b.txt", "backup/sub/deep/c.txt"]
    );
    assert_eq!(store.object("backup/sub/deep/c.txt").unwrap(), b"c");
    assert_eq!(report.transferred.len(), 3);
}

#[tokio::test]
async fn test_upload_non_recursive_ignores_subdirectories() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "a");
    write(dir.path(), "sub/b.txt", "b");
    let store = FakeStore::new();
    let sync = synchronizer(&store, &transfer_config(2, 0));

    sync.upload_folder(dir.path(), "", &SyncOptions::new())
        .await
        .unwrap();

    assert_eq!(store.keys(), vec!["a.txt"]);
}

#[tokio::test]
async fn test_upload_predicate_sees_relative_paths() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "a");
    write(dir.path(), "sub/b.txt", "b");
    write(dir.path(), "sub/c.log", "c");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let options = SyncOptions::new()
        .recursive(true)
        .exclude("log")
        .filter(move |path: &str| {
            recorder.lock().unwrap().push(path.to_string());
            path.starts_with("sub/")
        });
    let store = FakeStore::new();
    let sync = synchronizer(&store, &transfer_config(2, 0));

    let report = sync.upload_folder(dir.path(), "", &options).await.unwrap();

    // The extension filter runs first, so c.log never reaches the predicate
    assert_eq!(*seen.lock().unwrap(), vec!["a.txt", "sub/b.txt"]);
    assert_eq!(store.keys(), vec!["sub/b.txt"]);
    assert_eq!(report.skipped, 2);
}

#[tokio::test]
async fn test_upload_missing_directory() {
    let dir = TempDir::new().unwrap();
    let store = FakeStore::new();
    let sync = synchronizer(&store, &transfer_config(2, 0));

    let err = sync
        .upload_folder(&dir.path().join("absent"), "", &SyncOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::NotFound(_)));
}

#[tokio::test]
async fn test_upload_failure_does_not_stop_siblings() {
    let dir = TempDir::new().unwrap();
    for name in ["1.txt", "2.txt", "3.txt", "4.txt", "5.txt"] {
        write(dir.path(), name, name);
    }
    let store = FakeStore::new();
    store.fail_always("3.txt");
    let sync = synchronizer(&store, &transfer_config(2, 1));

    let err = sync
        .upload_folder(dir.path(), "", &SyncOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(store.keys(), vec!["1.txt", "2.txt", "4.txt", "5.txt"]);
    assert_eq!(store.attempts("3.txt"), 2);
    assert_eq!(sync.gate().available(), 2);
}

#[tokio::test]
async fn test_upload_respects_concurrency_limit() {
    let dir = TempDir::new().unwrap();
    for i in 0..12 {
        write(dir.path(), &format!("f{i:02}.bin"), "payload");
    }
    let store = FakeStore::new();
    store.set_latency(Duration::from_millis(15));
    let sync = synchronizer(&store, &transfer_config(3, 0));

    let report = sync
        .upload_folder(dir.path(), "", &SyncOptions::new())
        .await
        .unwrap();

    assert_eq!(report.transferred.len(), 12);
    assert!(store.peak_in_flight() <= 3, "peak was {}", store.peak_in_flight());
    assert!(store.peak_in_flight() >= 2);
    assert_eq!(sync.gate().available(), 3);
}

#[tokio::test]
async fn test_download_recursive_mirrors_tree() {
    let dir = TempDir::new().unwrap();
    let store = FakeStore::with_files(&[("a.txt", "a"), ("sub/d.txt", "d"), ("sub/x/e.txt", "e")]);
    let sync = synchronizer(&store, &transfer_config(2, 0));

    let report = sync
        .download_folder("", dir.path(), &SyncOptions::new().recursive(true))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "a");
    assert_eq!(std::fs::read_to_string(dir.path().join("sub/d.txt")).unwrap(), "d");
    assert_eq!(std::fs::read_to_string(dir.path().join("sub/x/e.txt")).unwrap(), "e");
    assert_eq!(
        report.transferred,
        vec![
            dir.path().join("a.txt"),
            dir.path().join("sub").join("d.txt"),
            dir.path().join("sub").join("x").join("e.txt"),
        ]
    );
}

#[tokio::test]
async fn test_download_rejects_parent_directory_entries() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    let store = FakeStore::with_files(&[("../escaped.txt", "x"), ("a.txt", "a")]);
    let sync = synchronizer(&store, &transfer_config(2, 0));

    let err = sync
        .download_folder("", &root, &SyncOptions::new().recursive(true))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::InvalidArgument(_)));
    assert!(!dir.path().join("escaped.txt").exists());
    assert_eq!(store.attempts("../escaped.txt"), 0);
}

#[tokio::test]
async fn test_download_non_recursive_skips_subdirectories() {
    let dir = TempDir::new().unwrap();
    let store = FakeStore::with_files(&[("sub/d.txt", "d")]);
    let sync = synchronizer(&store, &transfer_config(2, 0));

    let report = sync
        .download_folder("", dir.path(), &SyncOptions::new())
        .await
        .unwrap();

    assert!(report.transferred.is_empty());
    assert_eq!(report.skipped, 0);
    assert!(!dir.path().join("sub").exists());
    assert!(!dir.path().join("d.txt").exists());
}

#[tokio::test]
async fn test_download_from_subdirectory_is_rooted_there() {
    let dir = TempDir::new().unwrap();
    let store = FakeStore::with_files(&[("photos/2024/a.jpg", "jpg"), ("photos/cover.png", "png")]);
    let sync = synchronizer(&store, &transfer_config(2, 0));

    sync.download_folder("photos", dir.path(), &SyncOptions::new().recursive(true))
        .await
        .unwrap();

    assert!(dir.path().join("2024/a.jpg").is_file());
    assert!(dir.path().join("cover.png").is_file());
    assert!(!dir.path().join("photos").exists());
}

#[tokio::test]
async fn test_download_filters_on_remote_relative_path() {
    let dir = TempDir::new().unwrap();
    let store = FakeStore::with_files(&[
        ("a.txt", "a"),
        ("notes.MD", "n"),
        ("sub/keep.txt", "k"),
        ("sub/drop.txt", "d"),
    ]);
    let sync = synchronizer(&store, &transfer_config(2, 0));
    let options = SyncOptions::new()
        .recursive(true)
        .exclude("md")
        .filter(|path: &str| path != "sub/drop.txt");

    let report = sync.download_folder("", dir.path(), &options).await.unwrap();

    assert_eq!(report.transferred.len(), 2);
    assert_eq!(report.skipped, 2);
    assert!(dir.path().join("sub/keep.txt").is_file());
    assert!(!dir.path().join("sub/drop.txt").exists());
    assert!(!dir.path().join("notes.MD").exists());
}

#[tokio::test]
async fn test_download_listing_failure_transfers_nothing() {
    let dir = TempDir::new().unwrap();
    let store = FakeStore::with_files(&[("a.txt", "a"), ("sub/b.txt", "b")]);
    store.fail_listing("sub");
    let sync = synchronizer(&store, &transfer_config(2, 0));

    let err = sync
        .download_folder("", dir.path(), &SyncOptions::new().recursive(true))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::List { .. }));
    assert!(!dir.path().join("a.txt").exists());
}

#[tokio::test]
async fn test_download_failure_reported_after_others_finish() {
    let dir = TempDir::new().unwrap();
    let store = FakeStore::with_files(&[("a.txt", "a"), ("b.txt", "b"), ("c.txt", "c")]);
    store.fail_always("a.txt");
    let sync = synchronizer(&store, &transfer_config(1, 0));

    let err = sync
        .download_folder("", dir.path(), &SyncOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(dir.path().join("b.txt").is_file());
    assert!(dir.path().join("c.txt").is_file());
}

#[tokio::test]
async fn test_round_trip_upload_then_download() {
    let source = TempDir::new().unwrap();
    write(source.path(), "top.txt", "top");
    write(source.path(), "nested/inner.txt", "inner");
    let target = TempDir::new().unwrap();
    let store = FakeStore::new();
    let sync = synchronizer(&store, &transfer_config(3, 0));
    let options = SyncOptions::new().recursive(true);

    sync.upload_folder(source.path(), "mirror", &options)
        .await
        .unwrap();
    sync.download_folder("mirror", target.path(), &options)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(target.path().join("top.txt")).unwrap(), "top");
    assert_eq!(
        std::fs::read_to_string(target.path().join("nested/inner.txt")).unwrap(),
        "inner"
    );
}
