use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Default quiet period before a scheduled save hits the disk.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1_000;

/// Locations and timing of the file-backed host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Settings file holding every extension namespace.
    pub settings_path: PathBuf,
    /// Flat JSON file of the deprecated storage slot, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_path: Option<PathBuf>,
    /// Directory whose `*.json` files are the known records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worlds_dir: Option<PathBuf>,
    /// Debounce delay for durable writes, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("settings.json"),
            legacy_path: None,
            worlds_dir: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl HostConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
