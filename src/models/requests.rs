//! Request DTOs for the key-value API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the SET operation (POST /api/kv)
///
/// Missing fields deserialize as empty strings so that the service reports
/// them as a bad request rather than the extractor rejecting the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetRequest {
    /// The key to create
    #[serde(default)]
    pub key: String,
    /// The value to store
    #[serde(default)]
    pub value: String,
}
