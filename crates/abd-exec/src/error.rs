use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("invalid backend configuration: {0}")]
    InvalidConfig(String),
}
