//! Error types for the quota cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Guard Error Enum ==
/// Unified error type for the quota cache and its admin API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuardError {
    /// A limiter was asked to record a request while at capacity.
    ///
    /// Retryable: `retry_after` is the limiter's time until next slot.
    #[error("Rate limit exceeded for {name}: {limit} requests per {}ms", .window.as_millis())]
    QuotaExceeded {
        name: String,
        limit: usize,
        window: Duration,
        retry_after: Duration,
    },

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GuardError {
    // == Is Retryable ==
    /// Returns true for conditions that clear on their own with time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GuardError::QuotaExceeded { .. })
    }

    // == Retry After ==
    /// Returns how long to wait before retrying, for quota errors.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GuardError::QuotaExceeded { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = match &self {
            GuardError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            GuardError::NotFound(_) => StatusCode::NOT_FOUND,
            GuardError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GuardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            GuardError::QuotaExceeded {
                name, retry_after, ..
            } => json!({
                "error": self.to_string(),
                "limiter": name,
                "retry_after_secs": retry_after.as_secs(),
            }),
            _ => json!({ "error": self.to_string() }),
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(wait) = self.retry_after() {
            if let Ok(value) = HeaderValue::from_str(&wait.as_secs().to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for the quota cache.
pub type Result<T> = std::result::Result<T, GuardError>;
