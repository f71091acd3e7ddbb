//! A keyed set whose entries lapse after a fixed number of ticks.
//!
//! Expiry is lazy: an entry older than the window is simply reported absent
//! by [`ExpiringSet::contains`], and physically dropped the next time the set
//! is written to.  No background sweep is needed.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use hl_core::Tick;

#[derive(Clone, Debug)]
pub struct ExpiringSet<K> {
    entries:  FxHashMap<K, Tick>,
    window:   u64,
    capacity: Option<usize>,
}

impl<K: Copy + Eq + Hash> ExpiringSet<K> {
    /// Entries recorded at tick `N` are present for ticks `[N, N + window)`.
    pub fn new(window: u64) -> Self {
        Self { entries: FxHashMap::default(), window, capacity: None }
    }

    /// Cap the number of live entries; recording into a full set evicts the
    /// oldest entry first.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    #[inline]
    pub fn window(&self) -> u64 {
        self.window
    }

    /// Insert `key`, or refresh it if already present.
    pub fn record(&mut self, key: K, now: Tick) {
        self.purge_expired(now);
        if let Some(cap) = self.capacity {
            if !self.entries.contains_key(&key) && self.entries.len() >= cap {
                self.evict_oldest();
            }
        }
        self.entries.insert(key, now);
    }

    /// `true` while `key` was recorded less than `window` ticks before `now`.
    #[inline]
    pub fn contains(&self, key: &K, now: Tick) -> bool {
        self.entries.get(key).is_some_and(|&at| now.since(at) < self.window)
    }

    /// Tick at which `key` was last recorded, expired or not.
    pub fn recorded_at(&self, key: &K) -> Option<Tick> {
        self.entries.get(key).copied()
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every entry that has lapsed at `now`.
    pub fn purge_expired(&mut self, now: Tick) {
        let window = self.window;
        self.entries.retain(|_, at| now.since(*at) < window);
    }

    /// Stored entries, including lapsed ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self.entries.iter().min_by_key(|(_, at)| **at).map(|(k, _)| *k);
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
