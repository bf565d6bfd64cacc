//! Cache Module
//!
//! Provides a size-bounded in-memory cache with per-key adaptive TTL and
//! usage-rate eviction.

mod adaptive;
mod entry;
mod eviction;
mod key;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use adaptive::AdaptiveCache;
pub use entry::CacheEntry;
pub use eviction::select_victim;
pub use key::{create_key, KeyPart};
pub use stats::{CacheCounters, CacheStats, MOST_USED_COUNT};
pub use store::{estimate_size, CacheStore};
pub use ttl::{TtlPolicy, TtlRule};

// == Public Constants ==
/// Estimated size of a value that cannot be serialized, in bytes
pub const DEFAULT_ENTRY_SIZE: usize = 1024;

/// Default byte budget for a cache
pub const DEFAULT_MAX_SIZE: usize = 50 * 1024 * 1024; // 50 MB

/// Maximum allowed key length in bytes, enforced by the admin API
pub const MAX_KEY_LENGTH: usize = 256;
