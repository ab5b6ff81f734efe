//! API Handlers
//!
//! HTTP request handlers for each key-value endpoint. Status mapping lives in
//! `KvError`'s `IntoResponse` implementation.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::backend::{open_store, BackingStore};
use crate::cache::LruCache;
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::models::{HealthResponse, KvResponse, SetRequest, StatsResponse};
use crate::service::KvService;

/// Application state shared across all handlers.
///
/// Holds the one cache-aside service (and through it the one cache) for the
/// whole process.
#[derive(Clone)]
pub struct AppState {
    pub service: KvService,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: KvService) -> Self {
        Self { service }
    }

    /// Builds a fresh cache of `capacity` in front of `store`.
    pub fn with_store(
        capacity: usize,
        store: Arc<dyn BackingStore>,
        store_timeout: std::time::Duration,
    ) -> Self {
        let cache = Arc::new(LruCache::new(capacity));
        Self::new(KvService::new(cache, store, store_timeout))
    }

    /// Creates a new AppState from configuration, opening the backing store.
    pub fn from_config(config: &Config) -> std::result::Result<Self, StoreError> {
        let store = open_store(config)?;
        Ok(Self::with_store(
            config.cache_capacity,
            store,
            config.store_timeout(),
        ))
    }
}

/// Handler for POST /api/kv
///
/// Creates a key-value pair. Existing keys are rejected with 409.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<(StatusCode, Json<KvResponse>)> {
    state.service.write(&req.key, &req.value).await?;

    Ok((StatusCode::CREATED, Json(KvResponse::created(req.key))))
}

/// Handler for GET /api/kv/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KvResponse>> {
    let value = state.service.read(&key).await?;

    Ok(Json(KvResponse::found(key, value)))
}

/// Handler for DELETE /api/kv/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KvResponse>> {
    state.service.remove(&key).await?;

    Ok(Json(KvResponse::deleted(key)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.service.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::error::KvError;
    use std::time::Duration;

    fn test_state() -> AppState {
        AppState::with_store(100, Arc::new(MemoryStore::new()), Duration::from_secs(2))
    }

    fn set_request(key: &str, value: &str) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let (status, response) = set_handler(State(state.clone()), Json(set_request("k", "v")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.key, "k");

        let response = get_handler(State(state), Path("k".to_string())).await.unwrap();
        assert_eq!(response.value.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let result = get_handler(State(test_state()), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(KvError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_conflict() {
        let state = test_state();

        set_handler(State(state.clone()), Json(set_request("k", "v")))
            .await
            .unwrap();
        let result = set_handler(State(state), Json(set_request("k", "w"))).await;

        assert!(matches!(result, Err(KvError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        set_handler(State(state.clone()), Json(set_request("to_delete", "v")))
            .await
            .unwrap();

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let result = get_handler(State(state), Path("to_delete".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(test_state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_empty_key_is_invalid() {
        let result = set_handler(State(test_state()), Json(set_request("", "value"))).await;
        assert!(matches!(result, Err(KvError::Validation(_))));
    }

    #[test]
    fn test_from_config_memory_backend() {
        let config = Config {
            store_backend: crate::config::StoreBackend::Memory,
            cache_capacity: 3,
            ..Config::default()
        };
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.service.cache().capacity(), 3);
    }
}
