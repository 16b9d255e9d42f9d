use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid log format: {0} (expected: text|json|journald)")]
    InvalidFormat(String),

    #[error("journald is not supported on this platform")]
    JournaldNotSupported,

    #[error("failed to connect to journald: {0}")]
    JournaldInitFailed(String),

    #[error("logger already initialized")]
    AlreadyInitialized,

    #[error("invalid timezone: {0} (expected: utc|local)")]
    InvalidTimeZone(String),

    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
}

pub type LogResult<T> = Result<T, LogError>;
