//! Ports to the collaborators owned by the host application.
//!
//! The store never touches storage media itself. It reads and writes the
//! namespace object through [`SettingsHost`], reads the deprecated flat store
//! through [`LegacyStore`], and learns which records exist from [`RecordSource`].
use serde_json::{Map, Value};

use crate::error::HostError;

mod memory;
pub use memory::{MemoryLegacy, MemorySettings};

/// Live settings object shared with the host.
pub trait SettingsHost: Send + Sync {
    /// Return a copy of the namespace object, or `None` if it was never created.
    fn read_namespace(&self, namespace: &str) -> Result<Option<Map<String, Value>>, HostError>;

    /// Replace the namespace object in the live settings.
    fn write_namespace(&self, namespace: &str, value: Map<String, Value>) -> Result<(), HostError>;

    /// Ask the host to persist the live settings eventually.
    ///
    /// Several requests in a short window may coalesce into one durable write.
    fn schedule_save(&self) -> Result<(), HostError>;
}

/// Deprecated flat key-value store that held the whole mapping under one key.
pub trait LegacyStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError>;
}

/// Enumerates the records known to the host.
pub trait RecordSource {
    fn record_names(&self) -> Result<Vec<String>, HostError>;
}

impl RecordSource for [String] {
    fn record_names(&self) -> Result<Vec<String>, HostError> {
        Ok(self.to_vec())
    }
}

impl RecordSource for Vec<String> {
    fn record_names(&self) -> Result<Vec<String>, HostError> {
        Ok(self.clone())
    }
}
