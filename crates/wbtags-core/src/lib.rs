pub mod error;
pub mod host;
pub mod metrics;
pub mod store;
pub mod view;

pub use metrics::{MetricsHandle, MigrationOutcome, NoOpMetrics, SaveOutcome, StoreMetrics};

pub mod prelude {
    pub use crate::error::{HostError, StoreError};
    pub use crate::host::{LegacyStore, MemoryLegacy, MemorySettings, RecordSource, SettingsHost};
    pub use crate::store::{InitOutcome, TagStore};
    pub use crate::view::{RecordRow, TagFilter, overview, search_records};
}
