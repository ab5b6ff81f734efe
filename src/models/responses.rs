//! Response DTOs for the key-value API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for successful set, get and delete operations
#[derive(Debug, Clone, Serialize)]
pub struct KvResponse {
    /// Human readable outcome
    pub message: String,
    /// The key the operation applied to
    pub key: String,
    /// The stored value, present on reads only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl KvResponse {
    pub fn created(key: impl Into<String>) -> Self {
        Self {
            message: "Key-value pair successfully created".to_string(),
            key: key.into(),
            value: None,
        }
    }

    pub fn found(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            message: "Key found".to_string(),
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn deleted(key: impl Into<String>) -> Self {
        Self {
            message: "Key-value pair successfully deleted".to_string(),
            key: key.into(),
            value: None,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Configured cache capacity
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            capacity: stats.capacity,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
