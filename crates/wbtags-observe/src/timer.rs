use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::error::LogError;

/// Timezone used for log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTimeZone {
    #[default]
    Utc,
    /// System offset, detected once when the timer is built.
    Local,
}

impl FromStr for LogTimeZone {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LogError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LogTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogTimeZone::Utc => "utc",
            LogTimeZone::Local => "local",
        })
    }
}

/// RFC 3339 timestamp formatter with a fixed offset.
///
/// Local offset detection can fail once threads exist (most Unix platforms);
/// the timer then stays on UTC.
#[derive(Debug, Clone, Copy)]
pub struct LogTimer {
    offset: UtcOffset,
}

impl LogTimer {
    pub fn new(tz: LogTimeZone) -> Self {
        let offset = match tz {
            LogTimeZone::Utc => UtcOffset::UTC,
            LogTimeZone::Local => UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        };
        Self { offset }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl FormatTime for LogTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        match now.format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts} "),
            Err(_) => write!(w, "<invalid-time> "),
        }
    }
}
