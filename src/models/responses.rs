//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::limiter::LimiterStats;

/// Response body for a cache read (GET /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The cached value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for a cache write (PUT /cache)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cached", key),
            key,
        }
    }
}

/// Response body for a cache delete (DELETE /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for clearing the cache (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Entries dropped
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} entries", removed),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStats,
    pub quota: BTreeMap<String, LimiterStats>,
}

/// The limiter currently denying admission
#[derive(Debug, Clone, Serialize)]
pub struct BlockingLimiter {
    pub name: String,
    pub stats: LimiterStats,
    /// Message suitable for showing to the end user
    pub message: String,
}

/// Response body for the quota status endpoint (GET /quota)
#[derive(Debug, Clone, Serialize)]
pub struct QuotaResponse {
    /// Credential tier the quotas were sized for
    pub auth_mode: String,
    pub can_proceed: bool,
    /// Longest wait across all limiters, in seconds
    pub time_until_next_slot: u64,
    pub blocking: Option<BlockingLimiter>,
    pub limiters: BTreeMap<String, LimiterStats>,
}

/// Response body for an admitted request (POST /quota/acquire)
#[derive(Debug, Clone, Serialize)]
pub struct AcquireResponse {
    pub admitted: bool,
    pub limiters: BTreeMap<String, LimiterStats>,
}

impl AcquireResponse {
    pub fn admitted(limiters: BTreeMap<String, LimiterStats>) -> Self {
        Self {
            admitted: true,
            limiters,
        }
    }
}

/// Response body for resetting quotas (POST /quota/reset)
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub message: String,
}

impl ResetResponse {
    pub fn new(limiters: usize) -> Self {
        Self {
            message: format!("Reset {} limiters", limiters),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
