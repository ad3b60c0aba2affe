//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror, plus the JSON error
//! envelope returned by the HTTP surface.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type shared by every cache backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent or expired. Expected outcome, callers must handle it.
    #[error("cache miss")]
    Miss,

    /// The remote backend failed to complete the operation
    #[error("backend failure: {0}")]
    Backend(#[from] redis::RedisError),

    /// The operation deadline elapsed before the backend answered
    #[error("operation cancelled after {0:?}")]
    Cancelled(Duration),

    /// A value could not be encoded for, or decoded from, the backend
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backend construction parameters are unusable
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CacheError {
    /// Returns true for the expected "absent or expired" outcome.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss)
    }

    /// Returns true when repeating the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CacheError::Cancelled(_) => true,
            CacheError::Backend(err) => {
                err.is_io_error() || err.is_timeout() || err.is_connection_dropped()
            }
            _ => false,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            CacheError::Miss => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Cancelled(_) => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Backend(_) => StatusCode::BAD_GATEWAY,
            CacheError::Codec(_) | CacheError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Coarse classification reported next to the status code.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::Miss => "NOT_FOUND",
            CacheError::InvalidRequest(_) => "BAD_REQUEST",
            _ => "INTERNAL_ERROR",
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "error": self.to_string(),
            "code": status.as_u16(),
            "type": self.kind(),
            "retryable": self.is_retryable(),
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
