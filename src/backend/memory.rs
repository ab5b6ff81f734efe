use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::backend::BackingStore;
use crate::error::StoreError;

/// In-process store of record.
///
/// Counts every call so callers can observe how much traffic the cache absorbs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, String>>,
    reads: AtomicU64,
    creates: AtomicU64,
    deletes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `read` calls served so far.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn create_count(&self) -> u64 {
        self.creates.load(Ordering::Relaxed)
    }

    pub fn delete_count(&self) -> u64 {
        self.deletes.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

impl BackingStore for MemoryStore {
    fn create(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.creates.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.lock();
        if rows.contains_key(key) {
            return Err(StoreError::Conflict(key.to_string()));
        }
        rows.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.rows.lock().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        match self.rows.lock().remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_read_delete() {
        let store = MemoryStore::new();

        store.create("k", "v").unwrap();
        assert_eq!(store.read("k").unwrap(), Some("v".to_string()));
        store.delete("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);

        assert_eq!(store.create_count(), 1);
        assert_eq!(store.read_count(), 2);
        assert_eq!(store.delete_count(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_conflict_keeps_first_value() {
        let store = MemoryStore::new();

        store.create("k", "first").unwrap();
        assert!(matches!(store.create("k", "second"), Err(StoreError::Conflict(_))));
        assert_eq!(store.read("k").unwrap(), Some("first".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_missing() {
        let store = MemoryStore::new();
        assert!(matches!(store.delete("nope"), Err(StoreError::NotFound(_))));
    }
}
