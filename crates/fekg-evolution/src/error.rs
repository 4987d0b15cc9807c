//! Error types for the fekg-evolution crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvolutionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Store error: {0}")]
    Store(#[from] fekg_store::StoreError),

    #[error(transparent)]
    Core(#[from] fekg_core::FekgError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EvolutionError>;
