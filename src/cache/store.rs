//! Cache Store Module
//!
//! Size-bounded cache engine: HashMap storage, per-key TTL resolution and
//! usage-rate eviction.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::cache::stats::{to_mb, CacheCounters, MOST_USED_COUNT};
use crate::cache::{select_victim, CacheEntry, CacheStats, TtlPolicy, DEFAULT_ENTRY_SIZE};
use crate::clock::SharedClock;

// == Cache Store ==
/// Cache storage with a byte budget, adaptive TTL and usage-rate eviction.
///
/// The store itself is not synchronized; share it behind a lock (see
/// [`AdaptiveCache`](crate::cache::AdaptiveCache)).
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// TTL rules, fixed at construction
    policy: TtlPolicy,
    /// Sum of entry sizes
    size_used: usize,
    /// Byte budget
    max_size: usize,
    /// Next insertion sequence number
    next_seq: u64,
    /// Lifetime counters
    counters: CacheCounters,
    clock: SharedClock,
}

impl<V: Clone + Serialize> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_size` - Byte budget for the sum of estimated entry sizes
    /// * `policy` - TTL rules used for every key
    /// * `clock` - Time source for insertion stamps and expiry checks
    pub fn new(max_size: usize, policy: TtlPolicy, clock: SharedClock) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
            size_used: 0,
            max_size,
            next_seq: 0,
            counters: CacheCounters::default(),
            clock,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None if the key is absent or its TTL has elapsed; an expired
    /// entry is removed. A hit increments the entry's hit counter.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let ttl = self.policy.resolve(key);

        let expired = match self.entries.get(key) {
            None => {
                self.counters.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(ttl, now),
        };

        if expired {
            self.remove_entry(key);
            self.counters.record_miss();
            self.counters.record_expirations(1);
            debug!(key, "Cache entry expired on read");
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.record_hit();
        Some(entry.value.clone())
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry.
    ///
    /// Entries are evicted (lowest usage rate first) until the new value fits
    /// in the byte budget. A value larger than the whole budget empties the
    /// cache and is then held alone.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let size = estimate_size(&value);

        self.remove_entry(&key);

        while self.size_used + size > self.max_size && !self.entries.is_empty() {
            self.evict_one();
        }

        if size > self.max_size {
            debug!(key = %key, size, max_size = self.max_size, "Entry exceeds cache budget, holding it alone");
        }

        let now = self.clock.now_ms();
        let seq = self.next_seq;
        self.next_seq += 1;

        self.entries
            .insert(key, CacheEntry::new(value, size, now, seq));
        self.size_used += size;
    }

    // == Delete ==
    /// Removes an entry by key. Returns true if one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.size_used = 0;
    }

    // == Remove Expired ==
    /// Removes every entry whose TTL has elapsed, read or not.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| entry.is_expired(self.policy.resolve(key), now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.counters.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let total_hits: u64 = self.entries.values().map(|entry| entry.hits).sum();

        let oldest_entry = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.created_at, entry.seq))
            .map(|(key, _)| key.clone());

        let mut by_hits: Vec<(&String, &CacheEntry<V>)> = self.entries.iter().collect();
        by_hits.sort_by(|a, b| b.1.hits.cmp(&a.1.hits).then(a.1.seq.cmp(&b.1.seq)));
        let most_used = by_hits
            .into_iter()
            .take(MOST_USED_COUNT)
            .map(|(key, _)| key.clone())
            .collect();

        CacheStats {
            entries: self.entries.len(),
            size_used: self.size_used,
            size_used_mb: to_mb(self.size_used),
            hit_rate: CacheStats::compute_hit_rate(total_hits, self.entries.len()),
            oldest_entry,
            most_used,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            expirations: self.counters.expirations,
            ..CacheStats::new(self.max_size)
        }
    }

    // == Peek ==
    /// Returns an entry without touching its hit counter or checking expiry.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Returns true if `key` is stored, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size_used(&self) -> usize {
        self.size_used
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    // == Internal Helpers ==
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.size_used -= entry.size;
        Some(entry)
    }

    fn evict_one(&mut self) {
        let now = self.clock.now_ms();
        let Some(victim) = select_victim(&self.entries, now).cloned() else {
            return;
        };

        if let Some(entry) = self.remove_entry(&victim) {
            self.counters.record_eviction();
            debug!(
                key = %victim,
                hits = entry.hits,
                size = entry.size,
                "Evicted cache entry"
            );
        }
    }
}

// == Estimate Size ==
/// Estimates the memory cost of a value as the byte length of its JSON form.
///
/// Values that fail to serialize cost [`DEFAULT_ENTRY_SIZE`].
pub fn estimate_size<V: Serialize + ?Sized>(value: &V) -> usize {
    serde_json::to_vec(value)
        .map(|bytes| bytes.len())
        .unwrap_or(DEFAULT_ENTRY_SIZE)
}
