//! Write buffer for unflushed increments
//!
//! Increments land here instead of going to the store, and are committed in
//! batches: either on demand for one key (when a read misses the cache) or
//! for every key by the periodic flush task.
//!
//! One mutex guards the whole map. It is only ever held for map operations -
//! never across an await - so request handlers and the flush task contend on
//! it only briefly.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Buffered per-key increment deltas
///
/// Deltas are additive: concurrent increments to the same key accumulate
/// into one entry rather than queuing individually.
#[derive(Default)]
pub struct WriteBuffer {
    pending: Mutex<HashMap<String, i64>>,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one visit for a key
    ///
    /// Never blocks on the store and never fails.
    pub fn record(&self, key: &str) {
        let mut pending = self.pending.lock();
        *pending.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Peek at the pending delta for a key without draining it
    pub fn pending(&self, key: &str) -> i64 {
        self.pending.lock().get(key).copied().unwrap_or(0)
    }

    /// Atomically remove and return the pending delta for one key
    ///
    /// Returns 0 if the key has no pending increments. Of two callers racing
    /// on the same key, exactly one receives the delta.
    pub fn drain(&self, key: &str) -> i64 {
        self.pending.lock().remove(key).unwrap_or(0)
    }

    /// Atomically remove and return the entire buffer
    ///
    /// The swap happens under the lock, so an increment arriving after the
    /// snapshot goes into the fresh map and is never lost.
    pub fn drain_all(&self) -> HashMap<String, i64> {
        std::mem::take(&mut *self.pending.lock())
    }

    /// Merge an undelivered delta back into the buffer
    ///
    /// Used when a flush fails after draining: dropping the delta would lose
    /// counts permanently. Increments recorded since the drain are preserved
    /// by adding rather than replacing.
    pub fn requeue(&self, key: &str, delta: i64) {
        let mut pending = self.pending.lock();
        *pending.entry(key.to_string()).or_insert(0) += delta;
    }

    /// Number of keys with pending increments
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
