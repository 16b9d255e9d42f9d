//! Metrics collection abstraction for the tag store.
//!
//! Backends (prometheus, statsd, etc) implement [`StoreMetrics`] and are handed to
//! [`crate::store::TagStore::with_metrics`]. Without one the store reports into [`NoOpMetrics`].
mod backend;
pub use backend::{MetricsHandle, MigrationOutcome, SaveOutcome, StoreMetrics};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
