use crate::metrics::backend::{MigrationOutcome, SaveOutcome, StoreMetrics};

/// Metrics backend that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl StoreMetrics for NoOpMetrics {
    #[inline(always)]
    fn record_mutation(&self, _: &str) {}

    #[inline(always)]
    fn record_save(&self, _: SaveOutcome) {}

    #[inline(always)]
    fn record_degraded_read(&self) {}

    #[inline(always)]
    fn record_migration(&self, _: MigrationOutcome) {}
}
