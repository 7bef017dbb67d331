// tests/store.rs
use std::fs;

use outage_watch::error::StoreError;
use outage_watch::fingerprint::Fingerprint;
use outage_watch::store::{FileStore, PersistedState, StateStore};

fn sample() -> PersistedState {
    let data = vec!["01:00 - 02:00".to_string(), "Нет интервалов".to_string()];
    PersistedState::new(
        &Fingerprint::of_lines(&data),
        "2025-10-20T06:00:00Z".parse().unwrap(),
        data,
    )
}

#[test]
fn missing_file_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("state.json"));
    assert!(store.read().unwrap().is_none());
}

#[test]
fn write_then_read_gives_the_same_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested").join("deeper").join("state.json"));
    let st = sample();

    store.write(&st).unwrap();
    assert_eq!(store.read().unwrap(), Some(st));
}

#[test]
fn file_is_pretty_utf8_and_replaced_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = FileStore::new(&path);

    fs::write(&path, "x".repeat(4096)).unwrap();
    store.write(&sample()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n"));
    assert!(text.contains("Нет интервалов"));
    assert!(!text.contains('x'));
    assert!(text.contains("\"timestamp\": \"2025-10-20T06:00:00Z\""));

    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1, "temp file must not survive the rename");
}

#[test]
fn garbage_is_corrupt_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "[]").unwrap();
    let err = FileStore::new(&path).read().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[test]
fn directory_in_the_way_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::create_dir_all(&path).unwrap();
    let store = FileStore::new(&path);
    assert!(matches!(store.write(&sample()), Err(StoreError::Io { .. })));
}
