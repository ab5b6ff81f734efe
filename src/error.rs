//! Error types for the key-value service
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Outcomes reported by the backing store besides plain success.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Uniqueness violation on create
    #[error("Key already exists: {0}")]
    Conflict(String),

    /// Key absent on delete
    #[error("Key not found: {0}")]
    NotFound(String),

    /// The call did not complete within the configured bound
    #[error("Backing store timed out after {0:?}")]
    Timeout(Duration),

    /// Database failure other than a uniqueness violation
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Any other backend failure
    #[error("Backing store failure: {0}")]
    Internal(String),
}

// == KV Error Enum ==
/// Error type surfaced by the cache-aside service and the HTTP layer.
#[derive(Error, Debug)]
pub enum KvError {
    /// Empty key or value
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Key absent from both cache and store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key already present in the store
    #[error("Key already exists: {0}")]
    Conflict(String),

    /// Unexpected backing store failure
    #[error("Store error: {0}")]
    Store(String),
}

impl From<StoreError> for KvError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(key) => KvError::Conflict(key),
            StoreError::NotFound(key) => KvError::NotFound(key),
            other => KvError::Store(other.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for KvError {
    fn into_response(self) -> Response {
        let status = match &self {
            KvError::Validation(_) => StatusCode::BAD_REQUEST,
            KvError::NotFound(_) => StatusCode::NOT_FOUND,
            KvError::Conflict(_) => StatusCode::CONFLICT,
            KvError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the key-value service.
pub type Result<T> = std::result::Result<T, KvError>;
