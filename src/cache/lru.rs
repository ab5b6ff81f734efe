//! LRU Cache Module
//!
//! Thread-safe, capacity-bounded LRU cache. All operations are O(1).

use parking_lot::RwLock;
use tracing::trace;

use crate::cache::{CacheStats, RecencyList, StatsCounters};

// == LRU Cache ==
/// Bounded LRU cache shared by all request handlers.
///
/// One `RwLock` guards the recency list and its index as a single unit.
/// Lookups take the shared lock first and only upgrade to the exclusive lock
/// to promote a hit, re-validating the entry before touching it.
///
/// The cache never fails: a miss is a normal outcome, and deleting an absent
/// key does nothing.
#[derive(Debug)]
pub struct LruCache {
    /// Maximum number of live entries, fixed for the cache's lifetime
    capacity: usize,
    /// Recency list + index
    list: RwLock<RecencyList>,
    /// Hit, miss and eviction counters
    counters: StatsCounters,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is accepted and never retains anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            list: RwLock::new(RecencyList::with_capacity(capacity)),
            counters: StatsCounters::new(),
        }
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<String> {
        let (slot, stamp, value) = {
            let list = self.list.read();
            match list.lookup(key) {
                Some((slot, stamp, value)) => (slot, stamp, value.to_string()),
                None => {
                    self.counters.record_miss();
                    return None;
                }
            }
        };
        self.counters.record_hit();

        // The entry may have been deleted, evicted or replaced between the
        // two lock acquisitions; promote only the exact insertion we read.
        let mut list = self.list.write();
        if list.is_current(key, slot, stamp) {
            list.promote(slot);
        } else {
            trace!(key, "entry changed before promotion, skipping");
        }

        Some(value)
    }

    // == Put ==
    /// Inserts or replaces `key`, making it the most recently used entry.
    ///
    /// Returns the key evicted to make room, if any.
    pub fn put(&self, key: String, value: String) -> Option<String> {
        if self.capacity == 0 {
            self.counters.record_eviction();
            return Some(key);
        }

        let mut list = self.list.write();

        if let Some(slot) = list.slot_of(&key) {
            list.set_value(slot, value);
            list.promote(slot);
            return None;
        }

        let evicted = if list.len() >= self.capacity {
            list.pop_lru().map(|(evicted_key, _)| evicted_key)
        } else {
            None
        };
        if evicted.is_some() {
            self.counters.record_eviction();
        }

        list.push_front(key, value);
        evicted
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.list.write().remove(key).is_some()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.list.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Keys ==
    /// Returns the cached keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.list.read().keys_mru()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let total_entries = self.len();
        self.counters.snapshot(total_entries, self.capacity)
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let list = self.list.read();
        list.assert_consistent();
        assert!(list.len() <= self.capacity);
    }
}
