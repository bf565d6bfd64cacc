//! API Handlers
//!
//! HTTP request handlers for the admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use crate::admission::reserve;
use crate::cache::AdaptiveCache;
use crate::clock::SystemClock;
use crate::config::{AuthMode, Config};
use crate::error::{GuardError, Result};
use crate::limiter::QuotaGroup;
use crate::models::{
    AcquireResponse, BlockingLimiter, ClearResponse, DeleteResponse, GetResponse, HealthResponse,
    QuotaResponse, ResetResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache synchronizes itself; the quota group sits behind one lock so
/// check-and-record happens in a single critical section.
#[derive(Clone)]
pub struct AppState {
    /// Response cache
    pub cache: Arc<AdaptiveCache<Value>>,
    /// Upstream quotas
    pub quota: Arc<RwLock<QuotaGroup>>,
    /// Credential tier, used for user-facing messages
    pub auth_mode: AuthMode,
}

impl AppState {
    /// Creates a new AppState from a cache and a quota group.
    pub fn new(cache: AdaptiveCache<Value>, quota: QuotaGroup, auth_mode: AuthMode) -> Self {
        Self {
            cache: Arc::new(cache),
            quota: Arc::new(RwLock::new(quota)),
            auth_mode,
        }
    }

    /// Creates a new AppState from configuration, on the system clock.
    ///
    /// Starts the cache's sweep task, so call from within a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let clock = SystemClock::shared();
        let store = config.cache_store(clock.clone())?;
        let cache = AdaptiveCache::new(store, config.sweep_interval);
        Ok(Self::new(cache, config.quota_group(clock), config.auth_mode))
    }
}

/// Handler for PUT /cache
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GuardError::InvalidRequest(error_msg));
    }

    state.cache.set(req.key.clone(), req.value).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get(&key)
        .await
        .ok_or_else(|| GuardError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.delete(&key).await {
        return Err(GuardError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.len().await;
    state.cache.clear().await;

    Json(ClearResponse::new(removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.stats().await;
    let quota = state.quota.write().await.stats();

    Json(StatsResponse { cache, quota })
}

/// Handler for GET /quota
pub async fn quota_handler(State(state): State<AppState>) -> Json<QuotaResponse> {
    let mut quota = state.quota.write().await;
    let authenticated = state.auth_mode.is_authenticated();

    let blocking = quota.blocking_limiter_mut().map(|limiter| BlockingLimiter {
        name: limiter.name().to_string(),
        message: limiter.denial_message(authenticated),
        stats: limiter.stats(),
    });

    Json(QuotaResponse {
        auth_mode: state.auth_mode.as_str().to_string(),
        can_proceed: blocking.is_none(),
        time_until_next_slot: quota.time_until_next_slot().as_secs(),
        blocking,
        limiters: quota.stats(),
    })
}

/// Handler for POST /quota/acquire
///
/// Admits and records one upstream call, or answers 429 with the blocking
/// limiter and how long to wait.
pub async fn acquire_handler(State(state): State<AppState>) -> Result<Json<AcquireResponse>> {
    if let Err(denial) = reserve(&state.quota).await {
        warn!(error = %denial, "Upstream call denied");
        return Err(denial);
    }

    let limiters = state.quota.write().await.stats();
    Ok(Json(AcquireResponse::admitted(limiters)))
}

/// Handler for POST /quota/reset
pub async fn reset_handler(State(state): State<AppState>) -> Json<ResetResponse> {
    let mut quota = state.quota.write().await;
    quota.reset_all();

    Json(ResetResponse::new(quota.len()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
