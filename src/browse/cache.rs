//! browse::cache
//!
//! Bounded-TTL memo for partition results.
//!
//! # Design
//!
//! The partitioner is a pure function of its input, so its result can be
//! cached per `(field, parent, max_per_page)`. The cache is owned by the
//! calling layer, not hidden on the entity. Two things invalidate an
//! entry:
//!
//! - TTL expiry
//! - A sibling-set [`Fingerprint`] mismatch on lookup (the caller passes
//!   the fingerprint of the names it is about to partition; a stale entry
//!   is treated as a miss)
//!
//! Structural mutations should additionally call
//! [`PartitionCache::invalidate_field`] so cross-process readers never pay
//! the full TTL on a known-stale entry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::browse::partition::Partition;
use crate::core::types::{FieldId, Fingerprint, NodeId};

/// Cache key: one browse position at one page capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    pub field: FieldId,
    pub parent: Option<NodeId>,
    pub max_per_page: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    partition: Partition,
    fingerprint: Fingerprint,
    expires_at: Instant,
}

/// TTL-bounded partition memo.
#[derive(Debug)]
pub struct PartitionCache {
    ttl: Duration,
    entries: HashMap<PartitionKey, Entry>,
}

impl PartitionCache {
    /// Create a cache with the given entry lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Look up a cached partition for the current sibling set.
    ///
    /// Expired entries and fingerprint mismatches are misses; both are
    /// evicted on the way out.
    pub fn get(&mut self, key: &PartitionKey, fingerprint: &Fingerprint) -> Option<Partition> {
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() && entry.fingerprint == *fingerprint => {
                Some(entry.partition.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a partition for the given key and sibling-set fingerprint.
    pub fn insert(&mut self, key: PartitionKey, fingerprint: Fingerprint, partition: Partition) {
        self.entries.insert(
            key,
            Entry {
                partition,
                fingerprint,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every entry for a field. Call after any structural mutation.
    pub fn invalidate_field(&mut self, field: FieldId) {
        self.entries.retain(|key, _| key.field != field);
    }

    /// Number of live entries (expired ones included until touched).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(field: u32) -> PartitionKey {
        PartitionKey {
            field: FieldId(field),
            parent: None,
            max_per_page: 10,
        }
    }

    fn fingerprint(names: &[&str]) -> Fingerprint {
        Fingerprint::compute(names.iter().copied())
    }

    #[test]
    fn hit_within_ttl_and_matching_fingerprint() {
        let mut cache = PartitionCache::new(Duration::from_secs(60));
        let fp = fingerprint(&["apple", "banana"]);
        cache.insert(key(1), fp.clone(), Partition::SinglePage);

        assert_eq!(cache.get(&key(1), &fp), Some(Partition::SinglePage));
    }

    #[test]
    fn fingerprint_mismatch_is_a_miss_and_evicts() {
        let mut cache = PartitionCache::new(Duration::from_secs(60));
        cache.insert(key(1), fingerprint(&["apple"]), Partition::SinglePage);

        let other = fingerprint(&["apple", "banana"]);
        assert_eq!(cache.get(&key(1), &other), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let mut cache = PartitionCache::new(Duration::from_secs(0));
        let fp = fingerprint(&["apple"]);
        cache.insert(key(1), fp.clone(), Partition::SinglePage);

        assert_eq!(cache.get(&key(1), &fp), None);
    }

    #[test]
    fn invalidate_field_is_scoped() {
        let mut cache = PartitionCache::new(Duration::from_secs(60));
        let fp = fingerprint(&["apple"]);
        cache.insert(key(1), fp.clone(), Partition::SinglePage);
        cache.insert(key(2), fp.clone(), Partition::SinglePage);

        cache.invalidate_field(FieldId(1));

        assert_eq!(cache.get(&key(1), &fp), None);
        assert_eq!(cache.get(&key(2), &fp), Some(Partition::SinglePage));
    }
}
