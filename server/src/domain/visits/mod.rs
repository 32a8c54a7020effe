//! Visit counting
//!
//! The façade over the read cache, the write buffer, and the backing
//! counter store. Increments are acknowledged as soon as they land in the
//! buffer; a background task commits them to the store on a fixed interval,
//! and a cache-missing read commits its own key's pending delta first so
//! the caller sees their prior visits.
//!
//! The intended invariant: the true count for a key is always the store
//! value plus the increments buffered since that value was read. The cache
//! and buffer approximate this without a store round trip per request.

mod buffer;
mod cache;
mod key;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use buffer::WriteBuffer;
use cache::ReadCache;
pub use key::VisitKey;

use crate::core::config::CounterConfig;
use crate::data::store::{CounterStore, StoreError};

/// Which layer answered a read
///
/// Diagnostic only: `Redis` means "served by the backing store", whichever
/// backend is configured; `InMemory` means the store was not consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServedVia {
    InMemory,
    Redis,
}

/// A visit count and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitCount {
    pub visits: i64,
    pub served_via: ServedVia,
}

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("Counter store error: {0}")]
    Store(#[from] StoreError),
}

/// Visit counter service
///
/// One instance per process, shared by all request handlers and the flush
/// task. Owns the only mutable shared state in the system; handlers get an
/// `Arc` injected through router state.
pub struct VisitCounterService {
    store: Arc<CounterStore>,
    cache: ReadCache,
    buffer: WriteBuffer,
    flush_interval: Duration,
}

impl VisitCounterService {
    pub fn new(store: Arc<CounterStore>, config: &CounterConfig) -> Self {
        Self {
            store,
            cache: ReadCache::new(config.cache_ttl()),
            buffer: WriteBuffer::new(),
            flush_interval: config.flush_interval(),
        }
    }

    /// Record a visit for a page
    ///
    /// Buffers the increment and returns immediately: the visit is
    /// acknowledged before it is durable. No store access, no cache
    /// mutation.
    pub fn record_visit(&self, page_id: &str) {
        let counter_key = VisitKey::visit(page_id);
        self.buffer.record(&counter_key);
        tracing::trace!(key = %counter_key, "Visit buffered");
    }

    /// Get the current visit count for a page
    ///
    /// A fresh cache entry answers without touching the store: the cached
    /// value plus the key's pending delta (peeked, not drained). On a miss
    /// or an expired entry, the key's pending delta is committed first so
    /// the store read reflects the caller's own prior visits, then the
    /// fresh value is cached.
    pub async fn visit_count(&self, page_id: &str) -> Result<VisitCount, CounterError> {
        let counter_key = VisitKey::visit(page_id);

        if let Some(entry) = self.cache.get(&counter_key)
            && self.cache.is_valid(&entry)
        {
            let pending = self.buffer.pending(&counter_key);
            return Ok(VisitCount {
                visits: entry.value + pending,
                served_via: ServedVia::InMemory,
            });
        }

        // The drain is atomic, so of two requests racing past an expired
        // entry only one carries the delta; the other flushes nothing and
        // just re-reads.
        let pending = self.buffer.drain(&counter_key);
        if pending > 0
            && let Err(e) = self.store.increment(&counter_key, pending).await
        {
            // Undelivered counts go back into the buffer; losing them
            // permanently is worse than a late commit.
            self.buffer.requeue(&counter_key, pending);
            return Err(e.into());
        }

        let fresh = self.store.get(&counter_key).await?;
        self.cache.put(&counter_key, fresh);

        Ok(VisitCount {
            visits: fresh,
            served_via: ServedVia::Redis,
        })
    }

    /// Commit every buffered delta to the store
    ///
    /// One key failing does not abort the rest: its delta is re-queued and
    /// the failure logged. A committed key with a live cache entry gets that
    /// entry refreshed with the returned total, so cache hits don't
    /// undercount by the amount just flushed. Returns the number of keys
    /// committed.
    pub async fn flush_pending(&self) -> usize {
        let drained = self.buffer.drain_all();
        if drained.is_empty() {
            return 0;
        }

        let mut flushed = 0usize;
        for (counter_key, delta) in drained {
            if delta <= 0 {
                continue;
            }
            match self.store.increment(&counter_key, delta).await {
                Ok(total) => {
                    self.cache.refresh_if_present(&counter_key, total);
                    flushed += 1;
                    tracing::trace!(key = %counter_key, delta, total, "Delta flushed");
                }
                Err(e) => {
                    tracing::warn!(key = %counter_key, delta, error = %e, "Flush failed, re-queueing delta");
                    self.buffer.requeue(&counter_key, delta);
                }
            }
        }

        if flushed > 0 {
            tracing::debug!(keys = flushed, "Write buffer flushed");
        }
        flushed
    }

    /// Start the periodic flush task
    ///
    /// Drains the entire buffer every `flush_interval` for the lifetime of
    /// the process. On shutdown the task performs one final flush before
    /// exiting, so acknowledged visits survive a clean stop.
    pub fn start_flush_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(service.flush_interval);
            interval.tick().await; // Skip immediate first tick

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            service.flush_pending().await;
                            tracing::debug!("Flush task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        service.flush_pending().await;
                    }
                }
            }
        })
    }
}
