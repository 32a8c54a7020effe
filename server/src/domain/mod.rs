//! Domain logic
//!
//! - `visits` - visit counting: read cache, write buffer, flush scheduling

pub mod visits;

pub use visits::{CounterError, ServedVia, VisitCount, VisitCounterService, VisitKey};
