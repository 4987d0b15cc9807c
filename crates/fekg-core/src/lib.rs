//! fekg-core: Shared types, configuration, and filtering for the FE-EKG toolkit.
//!
//! This crate provides the foundational types used across all FE-EKG components:
//! - Event records and their severity / kind enums
//! - Directed, scored evolution links between events and their component scores
//! - Client-side event filtering and pagination
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod filter;
pub mod types;

pub use config::FekgConfig;
pub use error::{FekgError, Result};
pub use filter::{paginate, EventFilter, Page};
pub use types::{
    ComponentScores, Event, EventId, EventType, EvolutionLink, LinkKey, ScoreComponent, Severity,
};
