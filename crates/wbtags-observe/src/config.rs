use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{filter::LogFilter, format::LogFormat, timer::LogTimeZone};

/// Logger configuration.
///
/// Every field has a default, so a partial (or empty) config object is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub filter: LogFilter,
    pub tz: LogTimeZone,
    /// Include event targets (module paths).
    pub with_targets: bool,
    /// Colorize text output when stderr is a terminal.
    pub use_color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: LogFilter::default(),
            tz: LogTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LogConfig {
    /// Color only when enabled and stderr is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}
