use std::sync::Arc;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry, proto::MetricFamily};

use wbtags_core::{MigrationOutcome, SaveOutcome, StoreMetrics};

const NAMESPACE: &str = "wbtags";

/// Prometheus metrics backend for the tag store.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `op`: "set", "add", "remove", "bulk_add", "bulk_remove"
/// - `outcome` (saves): "saved", "failed"
/// - `outcome` (migrations): "migrated", "skipped", "aborted"
#[derive(Clone)]
pub struct PrometheusMetrics {
    mutations: IntCounterVec,
    saves: IntCounterVec,
    degraded_reads: IntCounter,
    migrations: IntCounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create the backend and register its counters in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let mutations = IntCounterVec::new(
            Opts::new("mutations_total", "Mutations that changed the tag mapping")
                .namespace(NAMESPACE),
            &["op"],
        )?;
        registry.register(Box::new(mutations.clone()))?;

        let saves = IntCounterVec::new(
            Opts::new("saves_total", "Tag mapping writes into the host settings")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(saves.clone()))?;

        let degraded_reads = IntCounter::with_opts(
            Opts::new(
                "degraded_reads_total",
                "Reads that fell back to an empty mapping",
            )
            .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(degraded_reads.clone()))?;

        let migrations = IntCounterVec::new(
            Opts::new("migrations_total", "Namespace creations by migration outcome")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(migrations.clone()))?;

        Ok(Self {
            mutations,
            saves,
            degraded_reads,
            migrations,
            registry,
        })
    }

    /// Create the backend with a private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl StoreMetrics for PrometheusMetrics {
    fn record_mutation(&self, op: &str) {
        self.mutations.with_label_values(&[op]).inc();
    }

    fn record_save(&self, outcome: SaveOutcome) {
        self.saves.with_label_values(&[outcome.as_label()]).inc();
    }

    fn record_degraded_read(&self) {
        self.degraded_reads.inc();
    }

    fn record_migration(&self, outcome: MigrationOutcome) {
        self.migrations
            .with_label_values(&[outcome.as_label()])
            .inc();
    }
}
