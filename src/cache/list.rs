//! Recency List Module
//!
//! Arena-backed doubly-linked list plus key index, kept together because the
//! two are only ever mutated as one unit.

use std::collections::HashMap;
use std::mem;

use crate::cache::entry::{Entry, NIL};

/// Arena slot of the most recently used boundary.
pub const HEAD: usize = 0;
/// Arena slot of the least recently used boundary.
pub const TAIL: usize = 1;

/// Upper bound on up-front allocation, large capacities grow on demand.
const MAX_PREALLOC: usize = 4096;

// == Recency List ==
/// Tracks live entries ordered by recency.
///
/// Layout:
/// - `HEAD.next` = most recently used
/// - `TAIL.prev` = least recently used
///
/// Every key in `index` points at a slot that is linked between the sentinels,
/// and every linked slot is reachable through `index`.
#[derive(Debug)]
pub struct RecencyList {
    /// Entry arena, slots 0 and 1 are the sentinels
    slots: Vec<Entry>,
    /// Recycled slots available for reuse
    free: Vec<usize>,
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Next insertion stamp (0 is reserved for vacant slots)
    next_stamp: u64,
}

impl RecencyList {
    // == Constructor ==
    /// Creates an empty list sized for roughly `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let prealloc = capacity.min(MAX_PREALLOC);
        let mut slots = Vec::with_capacity(prealloc + 2);
        slots.push(Entry::sentinel());
        slots.push(Entry::sentinel());
        slots[HEAD].next = TAIL;
        slots[TAIL].prev = HEAD;

        Self {
            slots,
            free: Vec::new(),
            index: HashMap::with_capacity(prealloc),
            next_stamp: 1,
        }
    }

    // == Lookup ==
    /// Returns the slot, stamp and value currently held for `key`.
    pub fn lookup(&self, key: &str) -> Option<(usize, u64, &str)> {
        self.index.get(key).map(|&slot| {
            let entry = &self.slots[slot];
            (slot, entry.stamp, entry.value.as_str())
        })
    }

    /// Returns the slot currently holding `key`.
    pub fn slot_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    // == Is Current ==
    /// Checks that `key` still maps to the same insertion that was observed as
    /// (`slot`, `stamp`). Fails once the key was deleted, evicted or reinserted.
    pub fn is_current(&self, key: &str, slot: usize, stamp: u64) -> bool {
        self.index.get(key) == Some(&slot) && self.slots[slot].stamp == stamp
    }

    // == Push Front ==
    /// Links a new entry at the most recently used end and indexes it.
    ///
    /// The key must not already be present.
    pub fn push_front(&mut self, key: String, value: String) -> usize {
        debug_assert!(!self.index.contains_key(&key), "duplicate key in recency list");

        let stamp = self.next_stamp;
        self.next_stamp += 1;

        let entry = Entry::new(key.clone(), value, stamp);
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = entry;
                slot
            }
            None => {
                self.slots.push(entry);
                self.slots.len() - 1
            }
        };

        self.link_front(slot);
        self.index.insert(key, slot);
        slot
    }

    // == Set Value ==
    /// Replaces the value held in a live slot.
    pub fn set_value(&mut self, slot: usize, value: String) {
        self.slots[slot].value = value;
    }

    // == Promote ==
    /// Moves a live slot to the most recently used end.
    pub fn promote(&mut self, slot: usize) {
        if self.slots[HEAD].next == slot {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    // == Remove ==
    /// Detaches and unindexes `key`, returning its key and value.
    pub fn remove(&mut self, key: &str) -> Option<(String, String)> {
        let slot = self.index.remove(key)?;
        Some(self.release(slot))
    }

    // == Pop LRU ==
    /// Removes the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn pop_lru(&mut self) -> Option<(String, String)> {
        let slot = self.slots[TAIL].prev;
        if slot == HEAD {
            return None;
        }
        self.index.remove(&self.slots[slot].key);
        Some(self.release(slot))
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Keys ==
    /// Returns live keys ordered from most to least recently used.
    pub fn keys_mru(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.slots[HEAD].next;
        while cursor != TAIL {
            keys.push(self.slots[cursor].key.clone());
            cursor = self.slots[cursor].next;
        }
        keys
    }

    fn link_front(&mut self, slot: usize) {
        let first = self.slots[HEAD].next;
        self.slots[slot].prev = HEAD;
        self.slots[slot].next = first;
        self.slots[first].prev = slot;
        self.slots[HEAD].next = slot;
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        self.slots[slot].prev = NIL;
        self.slots[slot].next = NIL;
    }

    /// Unlinks a slot that was already dropped from the index and recycles it.
    fn release(&mut self, slot: usize) -> (String, String) {
        self.unlink(slot);
        let entry = &mut self.slots[slot];
        entry.stamp = 0;
        let key = mem::take(&mut entry.key);
        let value = mem::take(&mut entry.value);
        self.free.push(slot);
        (key, value)
    }

    /// Walks the list and verifies it agrees with the index.
    #[cfg(test)]
    pub fn assert_consistent(&self) {
        let mut walked = 0;
        let mut prev = HEAD;
        let mut cursor = self.slots[HEAD].next;
        while cursor != TAIL {
            let entry = &self.slots[cursor];
            assert_eq!(entry.prev, prev, "broken back link at slot {}", cursor);
            assert!(entry.is_linked());
            assert_eq!(self.index.get(&entry.key), Some(&cursor));
            walked += 1;
            prev = cursor;
            cursor = entry.next;
        }
        assert_eq!(self.slots[TAIL].prev, prev);
        assert_eq!(walked, self.index.len());
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(keys: &[&str]) -> RecencyList {
        let mut list = RecencyList::with_capacity(keys.len());
        for key in keys {
            list.push_front(key.to_string(), format!("v_{}", key));
        }
        list
    }

    #[test]
    fn test_list_new() {
        let list = RecencyList::with_capacity(8);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.keys_mru().is_empty());
        list.assert_consistent();
    }

    #[test]
    fn test_push_front_orders_most_recent_first() {
        let list = list_of(&["a", "b", "c"]);

        assert_eq!(list.len(), 3);
        assert_eq!(list.keys_mru(), vec!["c", "b", "a"]);
        list.assert_consistent();
    }

    #[test]
    fn test_promote_moves_to_front() {
        let mut list = list_of(&["a", "b", "c"]);

        let slot = list.slot_of("a").unwrap();
        list.promote(slot);

        assert_eq!(list.keys_mru(), vec!["a", "c", "b"]);
        list.assert_consistent();
    }

    #[test]
    fn test_promote_head_is_noop() {
        let mut list = list_of(&["a", "b"]);

        let slot = list.slot_of("b").unwrap();
        list.promote(slot);

        assert_eq!(list.keys_mru(), vec!["b", "a"]);
        list.assert_consistent();
    }

    #[test]
    fn test_pop_lru() {
        let mut list = list_of(&["a", "b", "c"]);

        assert_eq!(list.pop_lru(), Some(("a".to_string(), "v_a".to_string())));
        assert_eq!(list.pop_lru(), Some(("b".to_string(), "v_b".to_string())));
        assert_eq!(list.len(), 1);
        assert!(list.lookup("a").is_none());
        list.assert_consistent();
    }

    #[test]
    fn test_pop_lru_empty() {
        let mut list = RecencyList::with_capacity(4);
        assert_eq!(list.pop_lru(), None);
    }

    #[test]
    fn test_remove_middle() {
        let mut list = list_of(&["a", "b", "c"]);

        assert_eq!(list.remove("b"), Some(("b".to_string(), "v_b".to_string())));
        assert_eq!(list.keys_mru(), vec!["c", "a"]);
        list.assert_consistent();
    }

    #[test]
    fn test_remove_nonexistent_key() {
        let mut list = list_of(&["a", "b"]);

        assert_eq!(list.remove("nonexistent"), None);
        assert_eq!(list.len(), 2);
        list.assert_consistent();
    }

    #[test]
    fn test_removed_slot_is_reused() {
        let mut list = list_of(&["a", "b"]);

        let slot = list.slot_of("a").unwrap();
        list.remove("a");
        let reused = list.push_front("c".to_string(), "v_c".to_string());

        assert_eq!(reused, slot);
        assert_eq!(list.keys_mru(), vec!["c", "b"]);
        list.assert_consistent();
    }

    #[test]
    fn test_is_current_detects_reinsertion() {
        let mut list = list_of(&["a"]);

        let (slot, stamp, _) = list.lookup("a").unwrap();
        assert!(list.is_current("a", slot, stamp));

        // Same key, same recycled slot, different insertion
        list.remove("a");
        let reused = list.push_front("a".to_string(), "again".to_string());
        assert_eq!(reused, slot);
        assert!(!list.is_current("a", slot, stamp));
    }

    #[test]
    fn test_set_value_keeps_position() {
        let mut list = list_of(&["a", "b"]);

        let slot = list.slot_of("a").unwrap();
        list.set_value(slot, "updated".to_string());

        assert_eq!(list.lookup("a").map(|(_, _, v)| v), Some("updated"));
        assert_eq!(list.keys_mru(), vec!["b", "a"]);
    }
}
