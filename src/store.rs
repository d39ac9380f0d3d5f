//! Rich history store
//!
//! Keeps the query history as one newest-first list persisted under a single
//! key. Every operation takes the current list and returns the new one; the
//! whole list is rewritten on each change.

use chrono::TimeZone;
use serde_json::Value;

use crate::db::KeyValueStore;
use crate::error::{HistoryError, Result};
use crate::filter::retention_boundary;
use crate::models::{HistoryEntry, HistorySettings, NewEntry};

/// Storage key of the entry list
pub const RICH_HISTORY_KEY: &str = "grafana.explore.richHistory";
/// Storage key of the history settings
pub const RICH_HISTORY_SETTINGS_KEY: &str = "grafana.explore.richHistory.settings";

/// Per-panel query identifier, ignored when comparing queries
const REF_ID: &str = "refId";

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

pub struct RichHistory<S: KeyValueStore> {
    storage: S,
    clock: Clock,
}

impl<S: KeyValueStore> RichHistory<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            clock: Box::new(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    /// Replace the millisecond clock used to stamp new entries
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the persisted list; a missing or corrupt value yields an empty list
    pub fn load(&self) -> Result<Vec<HistoryEntry>> {
        self.storage.get_object(RICH_HISTORY_KEY, Vec::new())
    }

    /// Record a new entry at the front of `history`.
    ///
    /// Returns `history` unchanged, without writing, when an entry for the
    /// same data source already holds the same queries.
    pub fn add_entry(&self, history: &[HistoryEntry], new: NewEntry) -> Result<Vec<HistoryEntry>> {
        let queries: Vec<Value> = new.queries.into_iter().filter(|q| !is_falsy(q)).collect();
        if queries.is_empty() {
            return Err(HistoryError::InvalidInput(
                "a history entry needs at least one query".to_string(),
            ));
        }

        let candidate: Vec<Value> = queries.iter().map(comparable).collect();
        let duplicate = history.iter().any(|e| {
            e.datasource_id == new.datasource_id
                && e.datasource_name == new.datasource_name
                && stored_queries_match(&e.queries, &candidate)
        });
        if duplicate {
            log::debug!("Skipping duplicate history entry for {}", new.datasource_name);
            return Ok(history.to_vec());
        }

        let queries = queries
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let entry = HistoryEntry {
            ts: self.next_ts(history),
            datasource_id: new.datasource_id,
            datasource_name: new.datasource_name,
            queries,
            starred: new.starred,
            comment: new.comment,
            session_name: new.session_name,
        };

        let mut updated = Vec::with_capacity(history.len() + 1);
        updated.push(entry);
        updated.extend_from_slice(history);

        self.persist(&updated)?;
        Ok(updated)
    }

    /// Flip the starred flag of the entry stamped `ts`
    pub fn update_starred(&self, history: &[HistoryEntry], ts: i64) -> Result<Vec<HistoryEntry>> {
        self.update_entry(history, ts, |e| e.starred = !e.starred)
    }

    pub fn update_comment(
        &self,
        history: &[HistoryEntry],
        ts: i64,
        comment: &str,
    ) -> Result<Vec<HistoryEntry>> {
        self.update_entry(history, ts, |e| e.comment = comment.to_string())
    }

    pub fn delete_entry(&self, history: &[HistoryEntry], ts: i64) -> Result<Vec<HistoryEntry>> {
        if !history.iter().any(|e| e.ts == ts) {
            log::warn!("Cannot delete history entry {}: not found", ts);
            return Ok(history.to_vec());
        }

        let updated: Vec<HistoryEntry> = history.iter().filter(|e| e.ts != ts).cloned().collect();
        self.persist(&updated)?;
        Ok(updated)
    }

    /// Remove the persisted list entirely
    pub fn delete_all(&self) -> Result<()> {
        self.storage.remove(RICH_HISTORY_KEY)?;
        log::info!("Cleared query history");
        Ok(())
    }

    /// Drop unstarred entries older than `retention_days` local days
    pub fn apply_retention(
        &self,
        history: &[HistoryEntry],
        retention_days: u32,
    ) -> Result<Vec<HistoryEntry>> {
        let now = chrono::Local
            .timestamp_millis_opt((self.clock)())
            .earliest()
            .unwrap_or_else(chrono::Local::now);
        let boundary = retention_boundary(retention_days, false, &now);

        let kept: Vec<HistoryEntry> = history
            .iter()
            .filter(|e| e.starred || e.ts > boundary)
            .cloned()
            .collect();

        let removed = history.len() - kept.len();
        if removed > 0 {
            self.persist(&kept)?;
            log::info!("Pruned {} history entries older than {} days", removed, retention_days);
        }
        Ok(kept)
    }

    pub fn load_settings(&self) -> Result<HistorySettings> {
        self.storage
            .get_object(RICH_HISTORY_SETTINGS_KEY, HistorySettings::default())
    }

    pub fn save_settings(&self, settings: &HistorySettings) -> Result<()> {
        self.storage.set_object(RICH_HISTORY_SETTINGS_KEY, settings)
    }

    fn update_entry(
        &self,
        history: &[HistoryEntry],
        ts: i64,
        apply: impl FnOnce(&mut HistoryEntry),
    ) -> Result<Vec<HistoryEntry>> {
        let mut updated = history.to_vec();
        let Some(entry) = updated.iter_mut().find(|e| e.ts == ts) else {
            log::warn!("Cannot update history entry {}: not found", ts);
            return Ok(updated);
        };
        apply(entry);

        self.persist(&updated)?;
        Ok(updated)
    }

    fn persist(&self, history: &[HistoryEntry]) -> Result<()> {
        self.storage.set_object(RICH_HISTORY_KEY, history)
    }

    /// Current time, bumped past any timestamp already in `history`
    fn next_ts(&self, history: &[HistoryEntry]) -> i64 {
        let mut ts = (self.clock)();
        while history.iter().any(|e| e.ts == ts) {
            ts += 1;
        }
        ts
    }
}

fn is_falsy(query: &Value) -> bool {
    match query {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Query without its `refId`, for structural comparison
fn comparable(query: &Value) -> Value {
    match query {
        Value::Object(map) => {
            let mut map = map.clone();
            map.remove(REF_ID);
            Value::Object(map)
        }
        other => other.clone(),
    }
}

fn stored_queries_match(stored: &[String], candidate: &[Value]) -> bool {
    stored.len() == candidate.len()
        && stored.iter().zip(candidate).all(|(raw, query)| {
            match serde_json::from_str::<Value>(raw) {
                Ok(parsed) => comparable(&parsed) == *query,
                Err(_) => *query == Value::String(raw.clone()),
            }
        })
}
