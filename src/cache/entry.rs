//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with usage tracking.

use std::time::Duration;

/// Shortest age used when scoring an entry, in milliseconds.
///
/// Keeps the score of an entry inserted this very millisecond finite.
const MIN_SCORE_AGE_MS: u64 = 1;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// An entry does not store its own TTL: the TTL is resolved from the key
/// every time the entry is checked.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Estimated size in bytes
    pub size: usize,
    /// Successful reads since insertion
    pub hits: u64,
    /// Insertion sequence number, used to break ties in insertion order
    pub seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry with zero hits.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `size` - Estimated size of the value in bytes
    /// * `now_ms` - Insertion time in Unix milliseconds
    /// * `seq` - Insertion sequence number
    pub fn new(value: V, size: usize, now_ms: u64, seq: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            size,
            hits: 0,
            seq,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since insertion.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry is still fresh at exactly `ttl` of age and
    /// expires strictly after it.
    pub fn is_expired(&self, ttl: Duration, now_ms: u64) -> bool {
        u128::from(self.age_ms(now_ms)) > ttl.as_millis()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    // == Score ==
    /// Usage rate in hits per second of age. Lower scores are evicted first.
    pub fn score(&self, now_ms: u64) -> f64 {
        let age_secs = self.age_ms(now_ms).max(MIN_SCORE_AGE_MS) as f64 / 1000.0;
        self.hits as f64 / age_secs
    }
}
