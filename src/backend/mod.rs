//! Backing Store Module
//!
//! The authoritative store of record behind the cache.
//!
//! # Backends
//! - `sqlite` - Relational store with a unique key column (default)
//! - `memory` - In-process map, useful for local runs and tests

mod memory;
mod sqlite;

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::error::StoreError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

// == Backing Store Trait ==
/// Durable key-value store consulted on cache misses and written before the cache.
///
/// Methods may block on I/O. Callers must not hold any cache lock while
/// calling them.
pub trait BackingStore: Send + Sync {
    /// Creates `key`. Fails with `StoreError::Conflict` when it already exists.
    fn create(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Returns the stored value, or None when the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Deletes `key`. Fails with `StoreError::NotFound` when it is absent.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Opens the backend selected by the configuration.
pub fn open_store(config: &Config) -> Result<Arc<dyn BackingStore>, StoreError> {
    let store: Arc<dyn BackingStore> = match config.store_backend {
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(&config.database_path)?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
