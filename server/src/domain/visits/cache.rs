//! Read cache for recently observed counter values
//!
//! One entry per key holding the last value read from the store and when it
//! was observed. Entries are replaced wholesale - a `put` swaps in a fresh
//! entry, nothing updates one in place - so per-key atomic replace is all
//! the synchronization this map needs, and no global lock exists here.
//!
//! The cache stores authoritative store values only; pending buffer deltas
//! are reconciled by the service at read time, never written here.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// A counter value as last observed from the store
#[derive(Debug, Clone, Copy)]
pub struct CacheEntry {
    pub value: i64,
    pub observed_at: Instant,
}

impl CacheEntry {
    fn new(value: i64) -> Self {
        Self {
            value,
            observed_at: Instant::now(),
        }
    }
}

/// Per-key read cache with a fixed TTL
pub struct ReadCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ReadCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up the entry for a key
    ///
    /// Pure lookup: no eviction, no freshness check. Expired entries are
    /// returned too - validity is the caller's question, via `is_valid`.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| *entry)
    }

    /// Replace the entry for a key with a freshly observed value
    pub fn put(&self, key: &str, value: i64) {
        self.entries.insert(key.to_string(), CacheEntry::new(value));
    }

    /// Whether an entry is still fresh
    pub fn is_valid(&self, entry: &CacheEntry) -> bool {
        entry.observed_at.elapsed() < self.ttl
    }

    /// Replace the entry for a key only if one exists
    ///
    /// Used by the periodic flush: after committing a key's delta the old
    /// cached value undercounts by exactly that delta, so an existing entry
    /// is replaced with the fresh total the store returned. Keys nobody has
    /// read stay uncached.
    pub fn refresh_if_present(&self, key: &str, value: i64) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            *entry = CacheEntry::new(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent() {
        let cache = ReadCache::new(Duration::from_secs(5));
        assert!(cache.get("visit:p1").is_none());
    }

    #[test]
    fn test_put_then_get() {
        let cache = ReadCache::new(Duration::from_secs(5));
        cache.put("visit:p1", 42);
        let entry = cache.get("visit:p1").unwrap();
        assert_eq!(entry.value, 42);
        assert!(cache.is_valid(&entry));
    }

    #[test]
    fn test_put_replaces_wholesale() {
        let cache = ReadCache::new(Duration::from_secs(5));
        cache.put("visit:p1", 10);
        cache.put("visit:p1", 20);
        assert_eq!(cache.get("visit:p1").unwrap().value, 20);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = ReadCache::new(Duration::from_millis(20));
        cache.put("visit:p1", 1);
        assert!(cache.is_valid(&cache.get("visit:p1").unwrap()));

        tokio::time::sleep(Duration::from_millis(40)).await;

        // Still returned by get (pure lookup), but no longer valid
        let entry = cache.get("visit:p1").unwrap();
        assert!(!cache.is_valid(&entry));
    }

    #[test]
    fn test_refresh_if_present_replaces_existing() {
        let cache = ReadCache::new(Duration::from_secs(5));
        cache.put("visit:p1", 10);
        cache.refresh_if_present("visit:p1", 13);
        assert_eq!(cache.get("visit:p1").unwrap().value, 13);
    }

    #[test]
    fn test_refresh_if_present_skips_uncached_key() {
        let cache = ReadCache::new(Duration::from_secs(5));
        cache.refresh_if_present("visit:p1", 13);
        assert!(cache.get("visit:p1").is_none());
    }
}
