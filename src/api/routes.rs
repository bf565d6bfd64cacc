//! API Routes
//!
//! Configures the Axum router with the admin endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    acquire_handler, clear_handler, delete_handler, get_handler, health_handler, quota_handler,
    reset_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /cache` - Store a response under a key
/// - `DELETE /cache` - Drop every cached response
/// - `GET /cache/:key` - Read a cached response
/// - `DELETE /cache/:key` - Invalidate one key
/// - `GET /stats` - Cache and quota statistics
/// - `GET /quota` - Admission status and the blocking limiter, if any
/// - `POST /quota/acquire` - Admit and record one upstream call
/// - `POST /quota/reset` - Clear every limiter's history
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", put(set_handler).delete(clear_handler))
        .route("/cache/:key", get(get_handler).delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/quota", get(quota_handler))
        .route("/quota/acquire", post(acquire_handler))
        .route("/quota/reset", post(reset_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
