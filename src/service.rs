//! Cache-Aside Service
//!
//! Serves reads from the cache, falling through to the backing store on a
//! miss, and keeps the cache in step with creates and deletes.
//!
//! The store is always the source of truth: writes and deletes resolve there
//! first and only then touch the cache. A failed, rejected or timed-out store
//! call leaves the cache exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::backend::BackingStore;
use crate::cache::{CacheStats, LruCache};
use crate::error::{KvError, Result, StoreError};

// == KV Service ==
/// Cache-aside coordinator shared by all request handlers.
#[derive(Clone)]
pub struct KvService {
    /// The single process-wide cache
    cache: Arc<LruCache>,
    /// Store of record
    store: Arc<dyn BackingStore>,
    /// Bound on each store call
    store_timeout: Duration,
}

impl KvService {
    // == Constructor ==
    pub fn new(cache: Arc<LruCache>, store: Arc<dyn BackingStore>, store_timeout: Duration) -> Self {
        Self {
            cache,
            store,
            store_timeout,
        }
    }

    pub fn cache(&self) -> &Arc<LruCache> {
        &self.cache
    }

    // == Read ==
    /// Returns the value for `key`, populating the cache on a store hit.
    pub async fn read(&self, key: &str) -> Result<String> {
        if key.is_empty() {
            return Err(KvError::NotFound(key.to_string()));
        }

        if let Some(value) = self.cache.get(key) {
            debug!(key, "cache hit");
            return Ok(value);
        }
        debug!(key, "cache miss, reading from store");

        let owned = key.to_string();
        match self.call_store(move |store| store.read(&owned)).await {
            Ok(Some(value)) => {
                if let Some(evicted) = self.cache.put(key.to_string(), value.clone()) {
                    debug!(key, evicted = %evicted, "cache populated with eviction");
                }
                Ok(value)
            }
            Ok(None) => Err(KvError::NotFound(key.to_string())),
            Err(err) => {
                error!(key, error = %err, "store read failed");
                Err(err.into())
            }
        }
    }

    // == Write ==
    /// Creates `key` in the store and caches it.
    ///
    /// Keys are create-once: an existing key yields `KvError::Conflict` and
    /// the cache is left untouched.
    pub async fn write(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() || value.is_empty() {
            return Err(KvError::Validation("Either key or value missing".to_string()));
        }

        let (owned_key, owned_value) = (key.to_string(), value.to_string());
        match self
            .call_store(move |store| store.create(&owned_key, &owned_value))
            .await
        {
            Ok(()) => {
                self.cache.put(key.to_string(), value.to_string());
                info!(key, "key-value pair created");
                Ok(())
            }
            Err(StoreError::Conflict(_)) => {
                warn!(key, "key-value pair already present");
                Err(KvError::Conflict(key.to_string()))
            }
            Err(err) => {
                error!(key, error = %err, "store create failed");
                Err(err.into())
            }
        }
    }

    // == Remove ==
    /// Deletes `key` from the store, then invalidates the cache.
    ///
    /// A crash between the two steps leaves a stale cache entry for a key the
    /// store no longer has; reads serve it until it is evicted.
    pub async fn remove(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::Validation("Key missing in delete request".to_string()));
        }

        let owned = key.to_string();
        match self.call_store(move |store| store.read(&owned)).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(KvError::NotFound(key.to_string())),
            Err(err) => {
                error!(key, error = %err, "store lookup before delete failed");
                return Err(err.into());
            }
        }

        let owned = key.to_string();
        match self.call_store(move |store| store.delete(&owned)).await {
            Ok(()) => {
                self.cache.delete(key);
                info!(key, "key-value pair deleted");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => {
                // Lost a race with another delete, which owns the invalidation.
                warn!(key, "key vanished before delete");
                Err(KvError::NotFound(key.to_string()))
            }
            Err(err) => {
                error!(key, error = %err, "store delete failed");
                Err(err.into())
            }
        }
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Runs a blocking store call off the async workers, bounded by the
    /// configured timeout. No cache lock is held here.
    async fn call_store<T, F>(&self, op: F) -> std::result::Result<T, StoreError>
    where
        F: FnOnce(&dyn BackingStore) -> std::result::Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let task = tokio::task::spawn_blocking(move || op(store.as_ref()));

        match tokio::time::timeout(self.store_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(StoreError::Internal(format!(
                "store task failed: {}",
                join_err
            ))),
            Err(_) => Err(StoreError::Timeout(self.store_timeout)),
        }
    }
}
