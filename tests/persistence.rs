//! Integration tests for the persistence layer

use headcount::{
    persistence::{HISTORY_CAPACITY, HistoryStore},
    test_helpers::SampleBuilder,
};

#[tokio::test]
async fn test_legacy_state_file_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("database.json");

    // A state file as the previous implementation wrote it: comma-grouped
    // counts and float unix timestamps.
    let legacy = r#"[
        {"player": "20,500", "date": 1700000000.25},
        {"player": "19,874", "date": 1700000060.0}
    ]"#;
    std::fs::write(&path, legacy).unwrap();

    let store = HistoryStore::load(path.clone()).await;
    assert_eq!(store.len().await, 2);
    assert_eq!(store.last().await.unwrap().count, 19_874);

    store.append(SampleBuilder::new().count(1234).build()).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let records = parsed.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["player"], "20,500");
    assert_eq!(records[2]["player"], "1,234");
    assert!(records[2]["date"].is_f64());
}

#[tokio::test]
async fn test_capacity_is_enforced_across_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("database.json");

    let store = HistoryStore::load(path.clone()).await;
    for count in 0..(HISTORY_CAPACITY as u64 + 5) {
        store.append(SampleBuilder::new().count(count).build()).await.unwrap();
    }

    assert_eq!(store.len().await, HISTORY_CAPACITY);
    assert_eq!(store.last().await.unwrap().count, HISTORY_CAPACITY as u64 + 4);

    let reloaded = HistoryStore::load(path).await;
    assert_eq!(reloaded.len().await, HISTORY_CAPACITY);
    let snapshot = reloaded.snapshot().await;
    assert_eq!(snapshot[0].count, 5);
}

#[tokio::test]
async fn test_malformed_state_file_yields_cold_start() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("database.json");
    std::fs::write(&path, "not json at all {").unwrap();

    let store = HistoryStore::load(path.clone()).await;
    assert_eq!(store.len().await, 0);

    store.append(SampleBuilder::new().count(42).build()).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}
