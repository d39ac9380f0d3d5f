use chrono::Utc;
use rich_history::heading::{build_heading_in, map_number_to_relative_label};
use rich_history::store::RICH_HISTORY_KEY;
use rich_history::{
    filter, heading, HistoryEntry, HistoryState, KeyValueStore, MemoryStore, NewEntry, RichHistory,
    SortOrder, SqliteStore,
};
use serde_json::json;
use tempfile::TempDir;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn prometheus(expr: &str) -> NewEntry {
    NewEntry::new("prom-uid", "Prometheus", vec![json!({ "expr": expr, "refId": "A" })])
}

#[test]
fn test_history_survives_reopening_database() {
    init();
    let temp_dir = TempDir::new().unwrap();

    let added = {
        let store = RichHistory::new(SqliteStore::open(temp_dir.path()).unwrap()).with_clock(|| 10);
        let history = store.add_entry(&[], prometheus("up")).unwrap();
        let history = store.update_comment(&history, 10, "health check").unwrap();
        store.update_starred(&history, 10).unwrap()
    };

    let store = RichHistory::new(SqliteStore::open(temp_dir.path()).unwrap());
    let loaded = store.load().unwrap();
    assert_eq!(loaded, added);
    assert_eq!(loaded[0].comment, "health check");
    assert!(loaded[0].starred);
}

#[test]
fn test_stored_format_is_camel_case_array() {
    let store = RichHistory::new(MemoryStore::new()).with_clock(|| 2);
    let mut new = prometheus("rate(http_requests_total[5m])");
    new.session_name = "morning".to_string();
    store.add_entry(&[], new).unwrap();

    let raw = store.storage().get(RICH_HISTORY_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        json!([{
            "ts": 2,
            "datasourceId": "prom-uid",
            "datasourceName": "Prometheus",
            "queries": ["{\"expr\":\"rate(http_requests_total[5m])\",\"refId\":\"A\"}"],
            "starred": false,
            "comment": "",
            "sessionName": "morning"
        }])
    );
}

#[test]
fn test_non_duplicate_adds_grow_by_one() {
    let store = RichHistory::new(MemoryStore::new());
    let mut history: Vec<HistoryEntry> = Vec::new();

    for (i, expr) in ["a", "b", "c", "d"].iter().enumerate() {
        history = store.add_entry(&history, prometheus(expr)).unwrap();
        assert_eq!(history.len(), i + 1);
        assert_eq!(history[0].queries[0], format!(r#"{{"expr":"{}","refId":"A"}}"#, expr));
    }

    // Older duplicate deeper in the list is still detected
    let again = store.add_entry(&history, prometheus("a")).unwrap();
    assert_eq!(again, history);
}

#[test]
fn test_delete_preserves_order_of_others() {
    let store = RichHistory::new(MemoryStore::new());
    let mut history = Vec::new();
    for expr in ["a", "b", "c"] {
        history = store.add_entry(&history, prometheus(expr)).unwrap();
    }
    let middle = history[1].ts;

    let remaining = store.delete_entry(&history, middle).unwrap();
    assert_eq!(remaining, vec![history[0].clone(), history[2].clone()]);
}

#[test]
fn test_grouped_display_pipeline() {
    let day = 24 * 60 * 60 * 1000;
    let clock = std::sync::Arc::new(std::sync::atomic::AtomicI64::new(day));
    let tick = clock.clone();
    let store = RichHistory::new(MemoryStore::new())
        .with_clock(move || tick.fetch_add(day, std::sync::atomic::Ordering::SeqCst));

    let state = HistoryState::new(store);
    state.add(prometheus("up")).unwrap();
    state.add(NewEntry::new("loki-uid", "Loki", vec![json!({ "expr": "{job=\"api\"}" })])).unwrap();
    state.add(prometheus("down")).unwrap();

    let entries = state.entries().unwrap();
    let only_prom = filter::filter_by_datasources(&entries, &["Prometheus".to_string()]);
    let sorted = filter::sort_entries(&only_prom, SortOrder::Ascending);
    let sections = heading::map_entries_to_headings_in(&sorted, SortOrder::Ascending, &Utc);

    let headings: Vec<&str> = sections.iter().map(|(h, _)| h.as_str()).collect();
    assert_eq!(headings, vec!["January 2", "January 4"]);

    let by_source = heading::map_entries_to_headings(&entries, SortOrder::DatasourceAZ);
    assert_eq!(by_source[0].0, "Prometheus");
    assert_eq!(by_source[0].1.len(), 2);
    assert_eq!(filter::datasource_names(&entries), vec!["Loki", "Prometheus"]);
}

#[test]
fn test_heading_scenarios() {
    let entry = HistoryEntry {
        ts: 1583932327000,
        datasource_id: "datasource historyId".to_string(),
        datasource_name: "datasource history name".to_string(),
        queries: vec![],
        starred: false,
        comment: String::new(),
        session_name: String::new(),
    };

    assert_eq!(map_number_to_relative_label(25), "25 days ago");
    assert_eq!(build_heading_in(&entry, SortOrder::Descending, &Utc), "March 11");
    assert_eq!(build_heading_in(&entry, SortOrder::DatasourceAZ, &Utc), "datasource history name");
}
