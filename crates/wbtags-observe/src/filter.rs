use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::LogError;

/// Validated `EnvFilter` directive string, e.g. `"info"` or `"wbtags_core=debug,warn"`.
///
/// Kept as text so it round-trips through config files unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogFilter(String);

impl LogFilter {
    pub fn new(directives: impl Into<String>) -> Result<Self, LogError> {
        Self::try_from(directives.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the subscriber filter.
    pub fn to_env_filter(&self) -> EnvFilter {
        // Validated on construction; fall back to the default rather than panic.
        EnvFilter::try_new(&self.0).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LogFilter {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LogFilter {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for LogFilter {
    type Error = LogError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        EnvFilter::try_new(&s)
            .map(|_| LogFilter(s.clone()))
            .map_err(|e| LogError::InvalidFilter(format!("{s}: {e}")))
    }
}

impl From<LogFilter> for String {
    fn from(f: LogFilter) -> Self {
        f.0
    }
}
