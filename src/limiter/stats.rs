//! Limiter Statistics Module
//!
//! Usage snapshot of a single sliding-window limiter.

use std::time::Duration;

use serde::Serialize;

// == Limiter Stats ==
/// Point-in-time usage of one limiter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LimiterStats {
    /// Requests recorded in the current window
    pub used: usize,
    /// Requests allowed per window
    pub limit: usize,
    /// `limit - used`, never negative
    pub available: usize,
    /// `used / limit` as a percentage, one decimal
    pub percent_used: f64,
    /// Seconds until a slot frees up, zero when under the limit
    pub time_until_reset: u64,
    /// Window length in seconds
    pub window: u64,
}

impl LimiterStats {
    // == Constructor ==
    /// Builds a snapshot from raw usage numbers.
    pub fn new(used: usize, limit: usize, time_until_reset: Duration, window: Duration) -> Self {
        Self {
            used,
            limit,
            available: limit.saturating_sub(used),
            percent_used: percent(used, limit),
            time_until_reset: time_until_reset.as_secs(),
            window: window.as_secs(),
        }
    }

    /// Returns true if another request would be admitted.
    pub fn has_headroom(&self) -> bool {
        self.used < self.limit
    }
}

fn percent(used: usize, limit: usize) -> f64 {
    if limit == 0 {
        return 100.0;
    }
    ((used as f64 / limit as f64) * 1000.0).round() / 10.0
}
