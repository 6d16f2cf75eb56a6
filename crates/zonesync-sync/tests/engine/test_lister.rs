use std::sync::Arc;

use zonesync_core::ports::storage_transport::IStorageTransport;
use zonesync_sync::{ConcurrencyGate, RemoteLister, SyncError};

use crate::common::{paths, FakeStore};

fn lister(store: &Arc<FakeStore>, capacity: usize) -> RemoteLister {
    RemoteLister::new(
        Arc::clone(store) as Arc<dyn IStorageTransport>,
        paths(),
        Arc::new(ConcurrencyGate::new(capacity)),
    )
}

fn names(entries: &[zonesync_core::domain::entry::RemoteEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[tokio::test]
async fn test_non_recursive_listing_keeps_store_order() {
    let store = FakeStore::with_files(&[("a.txt", "a"), ("b.txt", "b"), ("sub/c.txt", "c")]);

    let entries = lister(&store, 4).list("", false).await.unwrap();

    assert_eq!(names(&entries), vec!["a.txt", "b.txt", "sub"]);
    assert!(entries[2].is_directory);
    assert_eq!(store.listed_directories(), vec![String::new()]);
}

#[tokio::test]
async fn test_recursive_listing_returns_files_only() {
    let store = FakeStore::with_files(&[("a.txt", "a"), ("b.txt", "b"), ("sub/c.txt", "c")]);

    let entries = lister(&store, 4).list("/", true).await.unwrap();

    assert_eq!(names(&entries), vec!["a.txt", "b.txt", "c.txt"]);
    assert!(entries.iter().all(|e| !e.is_directory));
    assert_eq!(entries[2].full_path, "/zone/sub/");
}

#[tokio::test]
async fn test_recursive_listing_of_subdirectory() {
    let store = FakeStore::with_files(&[
        ("photos/2024/a.jpg", "a"),
        ("photos/2024/jan/b.jpg", "b"),
        ("photos/c.jpg", "c"),
        ("other/d.jpg", "d"),
    ]);

    let entries = lister(&store, 2).list("photos", true).await.unwrap();

    let mut listed: Vec<String> = entries
        .iter()
        .map(|e| paths().relative_file_path(&e.full_path, &e.name))
        .collect();
    listed.sort();
    assert_eq!(
        listed,
        vec!["photos/2024/a.jpg", "photos/2024/jan/b.jpg", "photos/c.jpg"]
    );
}

#[tokio::test]
async fn test_nesting_deeper_than_capacity_completes() {
    let store = FakeStore::with_files(&[("a/b/c/d/e/deep.txt", "x"), ("a/top.txt", "y")]);

    let entries = lister(&store, 1).list("", true).await.unwrap();

    let mut found = names(&entries);
    found.sort();
    assert_eq!(found, vec!["deep.txt", "top.txt"]);
}

#[tokio::test]
async fn test_subdirectory_listing_failure_discards_results() {
    let store = FakeStore::with_files(&[("a.txt", "a"), ("sub/c.txt", "c"), ("ok/d.txt", "d")]);
    store.fail_listing("sub");

    let err = lister(&store, 4).list("", true).await.unwrap_err();

    match err {
        SyncError::List { directory, source } => {
            assert_eq!(directory, "sub");
            assert_eq!(source.status(), Some(500));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Sibling listings still ran to completion
    assert!(store.listed_directories().contains(&"ok".to_string()));
}

#[tokio::test]
async fn test_root_listing_failure() {
    let store = FakeStore::with_files(&[("a.txt", "a")]);
    store.fail_listing("");

    let err = lister(&store, 4).list("", false).await.unwrap_err();
    assert!(matches!(err, SyncError::List { .. }));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_listing_is_not_retried() {
    let store = FakeStore::with_files(&[("a.txt", "a")]);
    store.fail("/", 1);

    assert!(lister(&store, 4).list("", false).await.is_err());
    assert_eq!(store.attempts("/"), 1);
}

#[tokio::test]
async fn test_gate_slots_returned_after_listing() {
    let store = FakeStore::with_files(&[("x/1.txt", "1"), ("y/2.txt", "2"), ("z/3.txt", "3")]);
    let gate = Arc::new(ConcurrencyGate::new(2));
    let lister = RemoteLister::new(
        Arc::clone(&store) as Arc<dyn IStorageTransport>,
        paths(),
        Arc::clone(&gate),
    );

    let entries = lister.list("", true).await.unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(gate.available(), 2);
}

#[tokio::test]
async fn test_gate_slots_returned_after_failed_listing() {
    let store = FakeStore::with_files(&[("x/1.txt", "1"), ("y/deep/2.txt", "2")]);
    store.fail_listing("y/deep");
    let gate = Arc::new(ConcurrencyGate::new(1));
    let lister = RemoteLister::new(
        Arc::clone(&store) as Arc<dyn IStorageTransport>,
        paths(),
        Arc::clone(&gate),
    );

    assert!(lister.list("", true).await.is_err());
    assert_eq!(gate.in_use(), 0);
}
