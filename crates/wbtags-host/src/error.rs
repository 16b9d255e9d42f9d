use thiserror::Error;

use wbtags_core::error::HostError;

#[derive(Debug, Error)]
pub enum HostIoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed settings file: {0}")]
    Malformed(String),

    #[error("no tokio runtime available to run the save debouncer")]
    NoRuntime,

    #[error("settings lock poisoned")]
    Poisoned,
}

impl From<HostIoError> for HostError {
    fn from(e: HostIoError) -> Self {
        match e {
            HostIoError::Io(e) => HostError::Io(e.to_string()),
            HostIoError::Json(e) => HostError::Malformed(e.to_string()),
            HostIoError::Malformed(msg) => HostError::Malformed(msg),
            other => HostError::Unavailable(other.to_string()),
        }
    }
}
