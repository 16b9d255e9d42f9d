use std::sync::Arc;

/// Result of pushing the mapping into the host settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Namespace written and a durable write scheduled.
    Saved,
    /// The write was dropped.
    Failed,
}

impl SaveOutcome {
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            SaveOutcome::Saved => "saved",
            SaveOutcome::Failed => "failed",
        }
    }
}

/// What happened when the namespace was created for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Legacy mapping adopted.
    Migrated,
    /// Nothing to migrate (no legacy value).
    Skipped,
    /// Legacy value unreadable; started empty.
    Aborted,
}

impl MigrationOutcome {
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            MigrationOutcome::Migrated => "migrated",
            MigrationOutcome::Skipped => "skipped",
            MigrationOutcome::Aborted => "aborted",
        }
    }
}

/// Store metrics collection interface.
///
/// All labels passed to a backend come from a small fixed set.
pub trait StoreMetrics: Send + Sync + 'static {
    /// Record a mutation that changed the mapping.
    ///
    /// `op` is one of `set`, `add`, `remove`, `bulk_add`, `bulk_remove`.
    fn record_mutation(&self, op: &str);

    /// Record the outcome of a save.
    fn record_save(&self, outcome: SaveOutcome);

    /// Record a read that fell back to an empty mapping.
    fn record_degraded_read(&self);

    /// Record namespace creation and its migration outcome.
    fn record_migration(&self, outcome: MigrationOutcome);
}

/// Shared handle to a metrics backend.
pub type MetricsHandle = Arc<dyn StoreMetrics>;
