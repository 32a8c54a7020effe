//! Data layer
//!
//! - `store` - the backing counter store (in-memory or Redis)

pub mod store;

pub use store::{CounterBackend, CounterStore, StoreError};
