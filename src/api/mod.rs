//! API Module
//!
//! HTTP handlers and routing exposing the cache contract as a REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `DELETE /purge` - Remove every entry
//! - `GET /size` - Entry count reported by the backend
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
