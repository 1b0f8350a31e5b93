/// Search history persistence tests against a real data directory
mod common;

use std::fs;

use chrono::{TimeZone, Utc};
use common::{DataDirBuilder, HISTORY_FILE, HistoryEntryBuilder};
use github_repo_explorer::history::{FileStorage, HistoryStore, MAX_HISTORY_ITEMS};
use github_repo_explorer::models::SearchMode;

fn store(dir: &std::path::Path) -> HistoryStore {
    HistoryStore::new(Box::new(FileStorage::new(dir)))
}

#[test]
fn test_history_survives_reopen() {
    let data_dir = DataDirBuilder::new().build();
    let saved_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

    store(data_dir.path()).save_at("rust cli", 20, SearchMode::Quick, saved_at);

    let history = store(data_dir.path()).load();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].query, "rust cli");
    assert_eq!(history[0].result_count, 20);
    assert_eq!(history[0].search_mode, SearchMode::Quick);
    assert_eq!(history[0].timestamp, saved_at);
}

#[test]
fn test_timestamps_keep_millisecond_precision() {
    let data_dir = DataDirBuilder::new().build();
    let precise = Utc.timestamp_nanos(1_700_000_000_123_456_789);

    store(data_dir.path()).save_at("precise", 1, SearchMode::Quick, precise);

    let history = store(data_dir.path()).load();
    assert_eq!(history[0].timestamp.timestamp_millis(), 1_700_000_000_123);
    assert_eq!(history[0].timestamp.timestamp_subsec_nanos(), 123_000_000);
}

#[test]
fn test_history_is_bounded_and_most_recent_first() {
    let data_dir = DataDirBuilder::new().build();
    let mut history_store = store(data_dir.path());

    for i in 0..=MAX_HISTORY_ITEMS {
        history_store.save(&format!("query {}", i), i, SearchMode::Quick);
    }

    let history = store(data_dir.path()).load();
    assert_eq!(history.len(), MAX_HISTORY_ITEMS);
    assert_eq!(history[0].query, format!("query {}", MAX_HISTORY_ITEMS));
    assert_eq!(history.last().unwrap().query, "query 1");
}

#[test]
fn test_repeated_query_moves_to_front() {
    let data_dir = DataDirBuilder::new().build();
    let mut history_store = store(data_dir.path());

    history_store.save("alpha", 1, SearchMode::Quick);
    history_store.save("beta", 2, SearchMode::Quick);
    history_store.save("alpha", 3, SearchMode::Exhaustive);

    let history = history_store.load();
    let queries: Vec<_> = history.iter().map(|e| e.query.as_str()).collect();
    assert_eq!(queries, ["alpha", "beta"]);
    assert_eq!(history[0].result_count, 3);
    assert_eq!(history[0].search_mode, SearchMode::Exhaustive);
}

#[test]
fn test_query_dedupe_is_case_sensitive() {
    let data_dir = DataDirBuilder::new().build();
    let mut history_store = store(data_dir.path());

    history_store.save("Rust", 1, SearchMode::Quick);
    history_store.save("rust", 1, SearchMode::Quick);

    assert_eq!(history_store.load().len(), 2);
}

#[test]
fn test_reads_epoch_millisecond_timestamps_and_legacy_mode_key() {
    let data_dir = DataDirBuilder::new()
        .with_history(
            r#"[{"id":"legacy","query":"old search","timestamp":1700000000000,"resultCount":7,"searchType":"exhaustive"}]"#,
        )
        .build();

    let history = store(data_dir.path()).load();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].timestamp, Utc.timestamp_millis_opt(1_700_000_000_000).unwrap());
    assert_eq!(history[0].search_mode, SearchMode::Exhaustive);
}

#[test]
fn test_corrupt_history_reads_as_empty_and_is_replaced() {
    let data_dir = DataDirBuilder::new().with_history("[{\"id\": ").build();
    let mut history_store = store(data_dir.path());

    assert!(history_store.load().is_empty());

    history_store.save("fresh start", 4, SearchMode::Quick);
    assert_eq!(history_store.load().len(), 1);
}

#[test]
fn test_remove_and_clear() {
    let data_dir = DataDirBuilder::new()
        .with_history_entries(&[
            HistoryEntryBuilder::new("first").id("one"),
            HistoryEntryBuilder::new("second").id("two"),
        ])
        .build();
    let mut history_store = store(data_dir.path());

    assert!(history_store.remove("one"));
    assert!(!history_store.remove("one"));
    assert_eq!(history_store.load().len(), 1);

    history_store.clear();
    assert!(history_store.load().is_empty());
    assert!(!data_dir.path().join(HISTORY_FILE).exists());

    // Clearing twice is harmless
    history_store.clear();
}

#[test]
fn test_save_creates_missing_data_dir() {
    let data_dir = DataDirBuilder::new().build();
    let nested = data_dir.path().join("nested").join("data");

    store(&nested).save("nested", 1, SearchMode::Quick);

    assert!(nested.join(HISTORY_FILE).exists());
    let stored = fs::read_to_string(nested.join(HISTORY_FILE)).unwrap();
    assert!(stored.contains("\"searchMode\":\"quick\""));
}

#[test]
#[cfg(unix)]
fn test_unwritable_data_dir_is_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let data_dir = DataDirBuilder::new().build();
    let locked = data_dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();

    let mut history_store = store(&locked);
    history_store.save("ignored", 1, SearchMode::Quick);

    // Root can write anyway; only check the store did not panic and stays readable
    let _ = history_store.load();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
}
