//! API Module
//!
//! HTTP handlers and routing for the key-value REST API.
//!
//! # Endpoints
//! - `POST /api/kv` - Create a key-value pair
//! - `GET /api/kv/:key` - Retrieve a value by key
//! - `DELETE /api/kv/:key` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
