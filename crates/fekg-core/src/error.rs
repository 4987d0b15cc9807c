use thiserror::Error;

/// Top-level error type shared by the FE-EKG crates.
#[derive(Error, Debug)]
pub enum FekgError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FekgError>;
