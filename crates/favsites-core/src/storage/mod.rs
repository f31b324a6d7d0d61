//! Storage layer
//!
//! Persists the bookmark collection as a single JSON file (the "slot").
//! The slot is read once when the store opens and rewritten in full after
//! every mutation, including when the collection becomes empty.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::JsonPersistence;
