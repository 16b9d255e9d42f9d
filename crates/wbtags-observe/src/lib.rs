//! Logging setup shared by the wbtags binaries.
//!
//! Everything in the workspace logs through `tracing`; this crate only decides
//! where those events go and how they look.
mod config;
pub use config::LogConfig;

mod error;
pub use error::{LogError, LogResult};

mod filter;
pub use filter::LogFilter;

mod format;
pub use format::LogFormat;

mod timer;
pub use timer::{LogTimeZone, LogTimer};

mod install;

/// Install the global tracing subscriber described by `cfg`.
///
/// With [`LogTimeZone::Local`] call this before any extra threads are spawned
/// (before building a multi-threaded runtime); offset detection falls back to UTC otherwise.
///
/// # Examples
/// ```rust
/// use wbtags_observe::{LogConfig, init_logging};
///
/// init_logging(&LogConfig::default()).expect("logger must install once");
/// tracing::info!("ready");
/// ```
pub fn init_logging(cfg: &LogConfig) -> LogResult<()> {
    match cfg.format {
        LogFormat::Text => install::text(cfg),
        LogFormat::Json => install::json(cfg),
        LogFormat::Journald => install::journald(cfg),
    }
}
