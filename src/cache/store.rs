//! Cache Store Module
//!
//! In-memory cache engine: one map guarded by one lock, per-key TTL,
//! lazy eviction on read and a background cleanup thread.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheStats, CacheStrategy, StoredEntry};
use crate::tasks::{spawn_cleanup_task, CleanupHandle};

/// Default interval between background cleanup passes
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

// == Store State ==
/// Everything the store lock protects.
#[derive(Debug)]
struct StoreState<V> {
    entries: HashMap<String, StoredEntry<V>>,
    stats: CacheStats,
}

impl<V> StoreState<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    /// Returns the live entry for `key`, dropping it first if it expired.
    fn live_entry(&mut self, key: &str) -> Option<&StoredEntry<V>> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            return None;
        }
        self.entries.get(key)
    }

    fn purge_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        removed
    }

    /// Iterates entries that are live at `now`, without removing the others.
    fn live_iter(&self, now: u64) -> impl Iterator<Item = (&String, &StoredEntry<V>)> {
        self.entries
            .iter()
            .filter(move |(_, entry)| !entry.is_expired_at(now))
    }
}

// == In-Memory Store ==
/// Thread-safe in-memory store with TTL support.
///
/// Listings (`size`, `keys`, `values`, `items`) are snapshots of live
/// entries: expired entries not yet purged are skipped but left for the
/// next read or cleanup pass to remove.
pub struct InMemoryStore<V> {
    state: Arc<Mutex<StoreState<V>>>,
    cleanup: Mutex<Option<CleanupHandle>>,
}

impl<V> InMemoryStore<V>
where
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a store whose cleanup thread wakes every `sweep_interval`.
    pub fn new(sweep_interval: Duration) -> Self {
        let store = Self::without_cleanup();

        let weak: Weak<Mutex<StoreState<V>>> = Arc::downgrade(&store.state);
        let handle = spawn_cleanup_task(sweep_interval, move || {
            weak.upgrade().map(|state| state.lock().purge_expired())
        });
        *store.cleanup.lock() = Some(handle);

        store
    }

    /// Creates a store with no cleanup thread. Expired entries are still
    /// evicted on read, and [`CacheStrategy::sweep_expired`] runs a pass
    /// on demand.
    pub fn without_cleanup() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::new())),
            cleanup: Mutex::new(None),
        }
    }

    /// Stops the cleanup thread, if any. Reads keep evicting lazily.
    pub fn stop_cleanup(&self) {
        if let Some(mut handle) = self.cleanup.lock().take() {
            handle.stop();
        }
    }

    pub fn has_cleanup_task(&self) -> bool {
        self.cleanup.lock().as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<V> Default for InMemoryStore<V>
where
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_SWEEP_INTERVAL)
    }
}

impl<V> Drop for InMemoryStore<V> {
    fn drop(&mut self) {
        if let Some(mut handle) = self.cleanup.get_mut().take() {
            handle.stop();
        }
    }
}

impl<V> CacheStrategy<V> for InMemoryStore<V>
where
    V: Clone + Send + 'static,
{
    fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();
        let value = state.live_entry(key).map(|entry| entry.value.clone());
        if value.is_some() {
            state.stats.record_hit();
        } else {
            state.stats.record_miss();
        }
        value
    }

    fn get_with_ttl(&self, key: &str) -> Option<(V, Option<u64>)> {
        let mut state = self.state.lock();
        let found = state
            .live_entry(key)
            .map(|entry| (entry.value.clone(), entry.ttl_remaining()));
        if found.is_some() {
            state.stats.record_hit();
        } else {
            state.stats.record_miss();
        }
        found
    }

    fn set(&self, key: String, value: V, ttl: Option<u64>) {
        let entry = StoredEntry::new(value, ttl);
        self.state.lock().entries.insert(key, entry);
    }

    fn delete(&self, key: &str) -> bool {
        self.state.lock().entries.remove(key).is_some()
    }

    fn clear(&self) {
        self.state.lock().entries.clear();
    }

    fn exists(&self, key: &str) -> bool {
        self.state.lock().live_entry(key).is_some()
    }

    fn get_ttl(&self, key: &str) -> Option<u64> {
        let state = self.state.lock();
        state.entries.get(key)?.ttl_remaining()
    }

    fn size(&self) -> usize {
        let state = self.state.lock();
        state.live_iter(current_timestamp_ms()).count()
    }

    fn keys(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .live_iter(current_timestamp_ms())
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn values(&self) -> Vec<V> {
        let state = self.state.lock();
        state
            .live_iter(current_timestamp_ms())
            .map(|(_, entry)| entry.value.clone())
            .collect()
    }

    fn items(&self) -> Vec<(String, V)> {
        let state = self.state.lock();
        state
            .live_iter(current_timestamp_ms())
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.total_entries = state.live_iter(current_timestamp_ms()).count();
        stats
    }

    fn sweep_expired(&self) -> usize {
        self.state.lock().purge_expired()
    }
}

impl<V> std::fmt::Debug for InMemoryStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("entries", &self.state.lock().entries.len())
            .finish()
    }
}
