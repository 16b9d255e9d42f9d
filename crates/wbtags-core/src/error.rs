use thiserror::Error;

use wbtags_model::ModelError;

/// Failure reported by a host collaborator (settings object, legacy store, record list).
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host settings unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("malformed host data: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for HostError {
    fn from(e: std::io::Error) -> Self {
        HostError::Io(e.to_string())
    }
}

/// Internal store failure.
///
/// Never escapes the public read/write operations of [`crate::store::TagStore`];
/// it is logged there and replaced by a safe default.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

pub type StoreResult<T> = Result<T, StoreError>;
