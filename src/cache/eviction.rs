//! Eviction Module
//!
//! Usage-rate eviction: the entry with the fewest hits per second of age is
//! the one that goes.
//!
//! Unlike plain LRU, an old entry that keeps getting read survives a young
//! entry that was read once and then forgotten.

use std::cmp::Ordering;

use crate::cache::CacheEntry;

// == Select Victim ==
/// Returns the key of the entry with the lowest score.
///
/// Ties go to the entry inserted first. Returns None for an empty iterator.
pub fn select_victim<'a, V: 'a>(
    entries: impl IntoIterator<Item = (&'a String, &'a CacheEntry<V>)>,
    now_ms: u64,
) -> Option<&'a String> {
    entries
        .into_iter()
        .map(|(key, entry)| (key, entry.score(now_ms), entry.seq))
        .min_by(|a, b| compare_scores(a.1, b.1).then(a.2.cmp(&b.2)))
        .map(|(key, _, _)| key)
}

fn compare_scores(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entry_with_hits(hits: u64, created_at: u64, seq: u64) -> CacheEntry<()> {
        let mut entry = CacheEntry::new((), 1, created_at, seq);
        entry.hits = hits;
        entry
    }

    #[test]
    fn test_empty_has_no_victim() {
        let entries: HashMap<String, CacheEntry<()>> = HashMap::new();
        assert_eq!(select_victim(&entries, 0), None);
    }

    #[test]
    fn test_lowest_rate_is_evicted() {
        let mut entries = HashMap::new();
        // 10 hits over 10s = 1.0/s
        entries.insert("steady".to_string(), entry_with_hits(10, 0, 0));
        // 2 hits over 5s = 0.4/s
        entries.insert("cooling".to_string(), entry_with_hits(2, 5_000, 1));
        // 3 hits over 1s = 3.0/s
        entries.insert("spiking".to_string(), entry_with_hits(3, 9_000, 2));

        assert_eq!(
            select_victim(&entries, 10_000).map(String::as_str),
            Some("cooling")
        );
    }

    #[test]
    fn test_young_entry_outranks_old_with_same_hits() {
        let mut entries = HashMap::new();
        entries.insert("old".to_string(), entry_with_hits(4, 0, 0));
        entries.insert("young".to_string(), entry_with_hits(4, 90_000, 1));

        assert_eq!(
            select_victim(&entries, 100_000).map(String::as_str),
            Some("old")
        );
    }

    #[test]
    fn test_ties_go_to_first_inserted() {
        let mut entries = HashMap::new();
        for (i, key) in ["c", "a", "d", "b"].iter().enumerate() {
            entries.insert(key.to_string(), entry_with_hits(0, 0, i as u64));
        }

        assert_eq!(select_victim(&entries, 0).map(String::as_str), Some("c"));
    }
}
