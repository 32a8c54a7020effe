//! Counter store
//!
//! The backing store for visit counters, with pluggable backends:
//! - In-memory (default) - uses dashmap, for development and tests
//! - Redis - uses deadpool-redis, for production
//!
//! The store is the durable source of truth. The caching/buffering layer in
//! `domain::visits` exists to keep request traffic off it.

mod backend;
mod error;
mod memory;
mod redis;

use std::sync::Arc;

pub use backend::CounterBackend;
pub use error::StoreError;

use memory::InMemoryStore;

use crate::core::config::{StoreBackend, StoreConfig};

/// Counter store service wrapping the configured backend
pub struct CounterStore {
    backend: Arc<dyn CounterBackend>,
}

impl std::fmt::Debug for CounterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterStore")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl CounterStore {
    /// Create a new counter store from configuration
    pub async fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let backend: Arc<dyn CounterBackend> = match config.backend {
            StoreBackend::Memory => {
                tracing::debug!("Initializing in-memory counter store");
                Arc::new(InMemoryStore::new())
            }
            StoreBackend::Redis => {
                let url = config.redis_url.as_ref().ok_or_else(|| {
                    StoreError::Config("redis_url required for Redis backend".into())
                })?;
                // Note: RedisStore::new logs sanitized URL internally
                Arc::new(redis::RedisStore::new(url).await?)
            }
        };

        Ok(Self { backend })
    }

    /// Create a store over an explicit backend (test seams)
    #[cfg(test)]
    pub fn with_backend(backend: Arc<dyn CounterBackend>) -> Self {
        Self { backend }
    }

    /// Get the backend name
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Atomically add `delta` to a counter, returning the new total
    pub async fn increment(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        self.backend.increment(key, delta).await
    }

    /// Get the current value of a counter (0 if the key is unknown)
    pub async fn get(&self, key: &str) -> Result<i64, StoreError> {
        self.backend.get(key).await
    }

    /// Health check
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.backend.health_check().await
    }
}
