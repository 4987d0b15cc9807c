//! Error types for the fekg-store crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Event not found: {event_id}")]
    NotFound { event_id: String },

    #[error("Failed to parse snapshot: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
