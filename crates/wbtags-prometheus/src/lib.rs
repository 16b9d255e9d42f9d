//! Prometheus metrics backend for the tag store.
//!
//! [`PrometheusMetrics`] implements [`wbtags_core::StoreMetrics`] and keeps its
//! counters in a prometheus [`Registry`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use wbtags_core::prelude::*;
//! use wbtags_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let store = TagStore::new(Arc::new(MemorySettings::new()))
//!     .with_metrics(Arc::new(metrics.clone()));
//!
//! store.add_tag("Dragons", "lore");
//!
//! let mut buffer = Vec::new();
//! TextEncoder::new().encode(&metrics.gather(), &mut buffer)?;
//! assert!(String::from_utf8(buffer)?.contains("wbtags_mutations_total"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `wbtags_mutations_total{op}` - Counter
//! - `wbtags_saves_total{outcome}` - Counter
//! - `wbtags_degraded_reads_total` - Counter
//! - `wbtags_migrations_total{outcome}` - Counter
//!
//! No HTTP endpoint is provided; callers encode [`PrometheusMetrics::gather`]
//! wherever they need it.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
