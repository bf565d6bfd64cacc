//! Cache Statistics Module
//!
//! Snapshot of cache occupancy and usage, plus lifetime counters.

use serde::Serialize;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Number of keys reported in `most_used`.
pub const MOST_USED_COUNT: usize = 5;

// == Cache Stats ==
/// Point-in-time view of a cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub entries: usize,
    /// Bytes currently accounted to entries
    pub size_used: usize,
    /// Configured byte budget
    pub max_size: usize,
    /// `size_used` in megabytes, two decimals
    pub size_used_mb: f64,
    /// `max_size` in megabytes, two decimals
    pub max_size_mb: f64,
    /// Average hits per live entry, two decimals
    pub hit_rate: f64,
    /// Key of the earliest inserted live entry
    pub oldest_entry: Option<String>,
    /// Most-hit keys, highest first
    pub most_used: Vec<String>,
    /// Reads that found nothing, including expired entries
    pub misses: u64,
    /// Entries removed to make room
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates an empty snapshot for a cache of `max_size` bytes.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            max_size_mb: to_mb(max_size),
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Average hits per entry, zero for an empty cache.
    pub fn compute_hit_rate(total_hits: u64, entries: usize) -> f64 {
        if entries == 0 {
            0.0
        } else {
            round2(total_hits as f64 / entries as f64)
        }
    }
}

// == Lifetime Counters ==
/// Counters that survive individual entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl CacheCounters {
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}

// == Utility Functions ==
/// Converts bytes to megabytes, rounded to two decimals.
pub fn to_mb(bytes: usize) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
