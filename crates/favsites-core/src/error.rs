//! Error types for bookmark operations

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// A rejected form submission
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Both name and link are required")]
    MissingNameAndLink,
    #[error("Name is required")]
    MissingName,
    #[error("Link is required")]
    MissingLink,
}

/// Errors returned by `Store` mutations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Input failed validation; nothing was changed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No bookmark has the given ID
    #[error("Bookmark not found: {0}")]
    NotFound(Uuid),

    /// The collection could not be written; the in-memory change was undone
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Whether this error came from user input rather than the system
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

/// Errors from a preview lookup
///
/// These never fail an add or edit; the store logs them and stores the
/// bookmark without an image.
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Preview API key is not configured")]
    MissingApiKey,

    #[error("Preview service returned HTTP {0}")]
    Status(u16),

    #[error("Preview request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid preview response: {0}")]
    Decode(String),
}

/// Check that both fields are present after trimming
pub fn validate(name: &str, link: &str) -> Result<(), ValidationError> {
    match (name.trim().is_empty(), link.trim().is_empty()) {
        (true, true) => Err(ValidationError::MissingNameAndLink),
        (true, false) => Err(ValidationError::MissingName),
        (false, true) => Err(ValidationError::MissingLink),
        (false, false) => Ok(()),
    }
}
