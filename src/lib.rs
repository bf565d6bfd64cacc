//! Quota Cache - admission control and response caching for a rate-limited
//! upstream API
//!
//! Provides a byte-budgeted cache with per-key TTL rules and score-based
//! eviction, sliding-window rate limiters, and quota groups that admit a
//! call only when every limiter does.

pub mod admission;
pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use admission::{fetch_through, reserve};
pub use api::AppState;
pub use cache::{AdaptiveCache, CacheStore, TtlPolicy};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::{AuthMode, Config};
pub use error::{GuardError, Result};
pub use limiter::{QuotaGroup, WindowLimiter};
