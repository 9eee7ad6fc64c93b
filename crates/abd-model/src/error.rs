use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("failed to encode: {0}")]
    Encode(String),

    #[error("failed to decode: {0}")]
    Decode(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
