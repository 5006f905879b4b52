//! Storage layer
//!
//! Handles dataset snapshot persistence.
//!
//! The snapshot is a single JSON document holding every item and every
//! registered list; a small sidecar file remembers which list the user
//! was looking at. All writes are atomic (temp file + rename).

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::{Snapshot, SnapshotPersistence};
