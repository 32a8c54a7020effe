//! Counter store backend trait definition

use async_trait::async_trait;

use super::error::StoreError;

/// Counter store backend trait
///
/// Defines the interface for the backing counter store. Both the in-memory
/// and Redis backends implement this trait.
///
/// # Consistency Notes
///
/// `increment` is atomic: concurrent increments from any number of
/// processes are commutative and none are lost. No transactionality is
/// assumed across an `increment` followed by a `get` — another writer may
/// land in between.
#[async_trait]
pub trait CounterBackend: Send + Sync {
    /// Atomically add `delta` to the counter and return the new total
    async fn increment(&self, key: &str, delta: i64) -> Result<i64, StoreError>;

    /// Get the current counter value
    ///
    /// Returns 0 for unknown keys; an unknown key is not an error.
    async fn get(&self, key: &str) -> Result<i64, StoreError>;

    /// Health check (validates connection)
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Backend name for debugging/logging
    fn backend_name(&self) -> &'static str;
}
