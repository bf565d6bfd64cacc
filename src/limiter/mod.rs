//! Limiter Module
//!
//! Sliding-window rate limiting: single limiters and named groups of them.

mod group;
mod stats;
mod window;


pub use group::QuotaGroup;
pub use stats::LimiterStats;
pub use window::WindowLimiter;

/// Name of the per-minute limiter registered by the standard configuration
pub const PER_MINUTE: &str = "perMinute";

/// Name of the per-hour limiter registered by the standard configuration
pub const PER_HOUR: &str = "perHour";
