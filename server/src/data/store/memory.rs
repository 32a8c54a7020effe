//! In-memory counter store
//!
//! Keeps counters in a `DashMap` of atomics. Intended for development and
//! tests; counts do not survive a process restart.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::CounterBackend;
use super::error::StoreError;

/// In-memory counter store backend
#[derive(Default)]
pub struct InMemoryStore {
    counters: DashMap<String, AtomicI64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterBackend for InMemoryStore {
    async fn increment(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        // Entry API gives exclusive access during insert - no TOCTOU race
        let counter = self.counters.entry(key.to_string()).or_default();
        Ok(counter.fetch_add(delta, Ordering::SeqCst) + delta)
    }

    async fn get(&self, key: &str) -> Result<i64, StoreError> {
        Ok(self
            .counters
            .get(key)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        // In-memory is always healthy
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_key_is_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("visit:nope").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_returns_new_total() {
        let store = InMemoryStore::new();
        assert_eq!(store.increment("visit:p1", 3).await.unwrap(), 3);
        assert_eq!(store.increment("visit:p1", 2).await.unwrap(), 5);
        assert_eq!(store.get("visit:p1").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryStore::new();
        store.increment("visit:a", 1).await.unwrap();
        store.increment("visit:b", 7).await.unwrap();
        assert_eq!(store.get("visit:a").await.unwrap(), 1);
        assert_eq!(store.get("visit:b").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_concurrent_increments_all_land() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryStore::new());
        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.increment("visit:hot", 1).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.get("visit:hot").await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = InMemoryStore::new();
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_backend_name() {
        let store = InMemoryStore::new();
        assert_eq!(store.backend_name(), "memory");
    }
}
