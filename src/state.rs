use std::sync::{Mutex, MutexGuard};

use crate::db::KeyValueStore;
use crate::error::{HistoryError, Result};
use crate::models::{HistoryEntry, HistorySettings, NewEntry};
use crate::store::RichHistory;

/// Shared history handle for the host application.
///
/// The entry list is read from storage on first access and cached. Each
/// mutation runs load-modify-persist under one lock, so concurrent callers
/// never interleave their writes.
pub struct HistoryState<S: KeyValueStore> {
    store: RichHistory<S>,

    /// Cached entry list, `None` until first loaded
    entries: Mutex<Option<Vec<HistoryEntry>>>,
}

impl<S: KeyValueStore> HistoryState<S> {
    pub fn new(store: RichHistory<S>) -> Self {
        Self {
            store,
            entries: Mutex::new(None),
        }
    }

    /// Backing storage, for reads. Writes made here bypass the cached list;
    /// call [`HistoryState::reload`] afterwards.
    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    /// Drop the cached list and read it again from storage
    pub fn reload(&self) -> Result<Vec<HistoryEntry>> {
        let mut guard = self.lock()?;
        *guard = None;
        Ok(self.cached(&mut guard)?.clone())
    }

    /// Snapshot of the current entry list
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        let mut guard = self.lock()?;
        Ok(self.cached(&mut guard)?.clone())
    }

    /// Get the entry stamped `ts`
    pub fn entry(&self, ts: i64) -> Result<HistoryEntry> {
        let mut guard = self.lock()?;
        self.cached(&mut guard)?
            .iter()
            .find(|e| e.ts == ts)
            .cloned()
            .ok_or(HistoryError::EntryNotFound(ts))
    }

    pub fn add(&self, new: NewEntry) -> Result<Vec<HistoryEntry>> {
        self.modify(|store, history| store.add_entry(history, new))
    }

    pub fn toggle_starred(&self, ts: i64) -> Result<Vec<HistoryEntry>> {
        self.modify(|store, history| store.update_starred(history, ts))
    }

    pub fn set_comment(&self, ts: i64, comment: &str) -> Result<Vec<HistoryEntry>> {
        self.modify(|store, history| store.update_comment(history, ts, comment))
    }

    pub fn delete(&self, ts: i64) -> Result<Vec<HistoryEntry>> {
        self.modify(|store, history| store.delete_entry(history, ts))
    }

    /// Clear all history, both stored and cached
    pub fn clear(&self) -> Result<()> {
        let mut guard = self.lock()?;
        self.store.delete_all()?;
        *guard = Some(Vec::new());
        Ok(())
    }

    /// Prune expired entries using the stored retention period
    pub fn apply_retention(&self) -> Result<Vec<HistoryEntry>> {
        let retention = self.store.load_settings()?.retention_period;
        self.modify(|store, history| store.apply_retention(history, retention))
    }

    pub fn settings(&self) -> Result<HistorySettings> {
        self.store.load_settings()
    }

    pub fn save_settings(&self, settings: &HistorySettings) -> Result<()> {
        self.store.save_settings(settings)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Vec<HistoryEntry>>>> {
        Ok(self.entries.lock()?)
    }

    fn cached<'a>(
        &self,
        guard: &'a mut MutexGuard<'_, Option<Vec<HistoryEntry>>>,
    ) -> Result<&'a mut Vec<HistoryEntry>> {
        if guard.is_none() {
            let loaded = self.store.load()?;
            log::debug!("Loaded {} history entries", loaded.len());
            **guard = Some(loaded);
        }
        Ok(guard.get_or_insert_with(Vec::new))
    }

    /// Replace the cache only when the operation succeeded
    fn modify(
        &self,
        op: impl FnOnce(&RichHistory<S>, &[HistoryEntry]) -> Result<Vec<HistoryEntry>>,
    ) -> Result<Vec<HistoryEntry>> {
        let mut guard = self.lock()?;
        let current = self.cached(&mut guard)?;
        let updated = op(&self.store, current)?;
        *current = updated.clone();
        Ok(updated)
    }
}
