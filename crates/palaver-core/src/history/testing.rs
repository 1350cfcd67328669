//! In-memory fake backend for store and adapter tests.
//!
//! Keeps each key's records newest-first, exactly like the real engine's
//! push order. Supports explicit expiry (so sliding-TTL behavior is
//! observable without wall-clock sleeps) and failure injection on either
//! half of the append batch.

use palaver_types::error::StoreError;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::backend::HistoryBackend;

#[derive(Default)]
struct Entry {
    /// Records, newest first.
    records: Vec<Vec<u8>>,
    ttl: Option<Duration>,
}

#[derive(Default)]
struct FakeState {
    entries: HashMap<String, Entry>,
    fail_push: bool,
    fail_expire: bool,
    fail_range: bool,
    /// When set, the Nth push (0-based) and every later one fail.
    fail_push_after: Option<usize>,
    pushes: usize,
}

/// Substitutable in-memory [`HistoryBackend`].
#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake backend lock poisoned")
    }

    /// The key's current expiry, if the key exists.
    pub(crate) fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.lock().entries.get(key).and_then(|e| e.ttl)
    }

    /// Shrink the key's stored expiry, simulating elapsed time.
    pub(crate) fn decay_ttl(&self, key: &str, by: Duration) {
        if let Some(entry) = self.lock().entries.get_mut(key) {
            entry.ttl = entry.ttl.map(|ttl| ttl.saturating_sub(by));
        }
    }

    /// Drop the key as if its TTL had fully elapsed.
    pub(crate) fn expire_now(&self, key: &str) {
        self.lock().entries.remove(key);
    }

    /// Push a raw record without touching the TTL, newest-first.
    pub(crate) fn seed_raw(&self, key: &str, record: Vec<u8>) {
        self.lock()
            .entries
            .entry(key.to_string())
            .or_default()
            .records
            .insert(0, record);
    }

    pub(crate) fn fail_push(&self, on: bool) {
        self.lock().fail_push = on;
    }

    pub(crate) fn fail_expire(&self, on: bool) {
        self.lock().fail_expire = on;
    }

    pub(crate) fn fail_range(&self, on: bool) {
        self.lock().fail_range = on;
    }

    /// Let `n` pushes succeed, then fail every one after them.
    pub(crate) fn fail_push_after(&self, n: usize) {
        self.lock().fail_push_after = Some(n);
    }
}

impl HistoryBackend for FakeBackend {
    async fn push_and_expire(
        &self,
        key: &str,
        record: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();

        let exhausted = state
            .fail_push_after
            .is_some_and(|limit| state.pushes >= limit);
        if state.fail_push || state.fail_expire || exhausted {
            // Either half failing discards the whole batch.
            return Err(StoreError::Backend("injected batch failure".to_string()));
        }

        state.pushes += 1;
        let entry = state.entries.entry(key.to_string()).or_default();
        entry.records.insert(0, record);
        entry.ttl = Some(ttl);
        Ok(())
    }

    async fn range_all(&self, key: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        let state = self.lock();
        if state.fail_range {
            return Err(StoreError::Backend("injected range failure".to_string()));
        }
        Ok(state
            .entries
            .get(key)
            .map(|e| e.records.clone())
            .unwrap_or_default())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.lock().entries.remove(key);
        Ok(())
    }
}
