//! KV Cache - A key-value store service with a cache-aside LRU layer
//!
//! Reads are served from a bounded in-memory LRU cache and fall through to a
//! relational backing store on a miss. Writes and deletes go to the store
//! first and then update the cache.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use api::AppState;
pub use config::Config;
pub use service::KvService;
