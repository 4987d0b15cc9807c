//! FE-EKG Store: read-only access to events and evolution links.
//!
//! The graph backend is an external collaborator; this crate only defines the
//! contract the rest of the toolkit reads through (`EventRepository`,
//! `LinkRepository`) and an in-memory `SnapshotStore` that serves a JSON
//! snapshot of backend responses.

pub mod error;
pub mod repository;
pub mod snapshot;

pub use error::{Result, StoreError};
pub use repository::{EventRepository, LinkQuery, LinkRepository};
pub use snapshot::{Snapshot, SnapshotStore};
