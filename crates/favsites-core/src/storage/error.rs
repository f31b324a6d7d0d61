//! Errors raised by the bookmarks slot

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reading, parsing or writing `bookmarks.json`
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot read bookmarks from '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write bookmarks to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The slot exists but is not a JSON array of bookmarks.
    /// `backup` is where a copy was kept, if copying worked.
    #[error("Bookmarks file '{path}' is not readable JSON ({details}). {}", backup_note(.backup))]
    Corrupt {
        path: PathBuf,
        backup: Option<PathBuf>,
        details: String,
    },

    #[error("Failed to encode bookmarks: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    /// A hint the user can act on, when there is one
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::Read { source, .. } | StorageError::Write { source, .. }
                if source.kind() == io::ErrorKind::PermissionDenied =>
            {
                Some("Check permissions on the data directory.")
            }
            StorageError::Write { .. } => {
                Some("Make sure the data directory is writable and the disk is not full.")
            }
            StorageError::Corrupt {
                backup: Some(_), ..
            } => Some("Entries can be recovered by hand from the backup copy."),
            StorageError::Corrupt { backup: None, .. } => {
                Some("Copy the file somewhere safe before adding bookmarks. The next save replaces it.")
            }
            _ => None,
        }
    }
}

fn backup_note(backup: &Option<PathBuf>) -> String {
    match backup {
        Some(path) => format!("A copy was kept at '{}'.", path.display()),
        None => "No backup copy could be made.".to_string(),
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
