use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use wbtags_host::HostConfig;
use wbtags_observe::LogConfig;

use crate::cli::Cli;

/// Top-level configuration file.
///
/// ```json
/// {
///   "log":  { "format": "text", "filter": "info" },
///   "host": { "settings_path": "settings.json", "worlds_dir": "worlds", "debounce_ms": 1000 }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogConfig,
    pub host: HostConfig,
}

impl AppConfig {
    /// Read `path` if given, otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Command line paths win over the file.
    pub fn apply_overrides(mut self, cli: &Cli) -> Self {
        if let Some(path) = &cli.settings {
            self.host.settings_path = path.clone();
        }
        if let Some(path) = &cli.legacy {
            self.host.legacy_path = Some(path.clone());
        }
        if let Some(dir) = &cli.worlds {
            self.host.worlds_dir = Some(dir.clone());
        }
        self
    }
}
