use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed legacy data: {0}")]
    MalformedLegacy(String),

    #[error("failed to encode settings: {0}")]
    Encode(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
