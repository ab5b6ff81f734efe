//! Cache Module
//!
//! Provides a thread-safe, bounded in-memory LRU cache.

mod entry;
mod list;
mod lru;
mod stats;


// Re-export public types
pub use entry::Entry;
pub use list::RecencyList;
pub use lru::LruCache;
pub use stats::{CacheStats, StatsCounters};
