//! API Handlers
//!
//! HTTP request handlers mapping each endpoint onto the cache contract.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::{Cache, SharedCache};
use crate::config::{BackendKind, Config};
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, PurgeResponse, SetRequest, SetResponse,
    SizeResponse,
};

/// Application state shared across all handlers.
///
/// Holds the configured backend behind the [`Cache`] contract. The backend
/// does its own locking, so handlers call it directly.
#[derive(Clone)]
pub struct AppState {
    /// Configured cache backend
    pub cache: SharedCache,
    /// Which backend `cache` is
    pub backend: BackendKind,
    /// TTL in seconds applied when a set request omits one
    pub default_ttl: i64,
}

impl AppState {
    /// Creates a new AppState around an already constructed backend.
    pub fn new<C>(cache: C, backend: BackendKind, default_ttl: i64) -> Self
    where
        C: Cache<Value> + 'static,
    {
        Self::from_shared(Arc::new(cache), backend, default_ttl)
    }

    pub fn from_shared(cache: SharedCache, backend: BackendKind, default_ttl: i64) -> Self {
        Self {
            cache,
            backend,
            default_ttl,
        }
    }

    /// Builds the backend described by `config` and wraps it.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let cache = crate::cache::build(config).await?;
        Ok(Self::from_shared(cache, config.backend, config.default_ttl))
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value with the request TTL or the configured default.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    state.cache.set(&req.key, req.value, ttl).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Ok(value) => Ok(Json(GetResponse::new(key, value))),
        Err(err) => {
            if err.is_miss() {
                debug!(%key, "cache miss");
            }
            Err(err)
        }
    }
}

/// Handler for DELETE /del/:key
///
/// Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /purge
pub async fn purge_handler(State(state): State<AppState>) -> Json<PurgeResponse> {
    state.cache.purge().await;
    Json(PurgeResponse::new())
}

/// Handler for GET /size
pub async fn size_handler(State(state): State<AppState>) -> Json<SizeResponse> {
    let size = state.cache.size().await;
    Json(SizeResponse::new(size, state.backend.to_string()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
