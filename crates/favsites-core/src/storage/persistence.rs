//! Bookmarks slot persistence
//!
//! Handles saving and loading the bookmark collection to/from a single JSON
//! file. Uses atomic writes (write to temp file, then rename) to prevent
//! corruption.
//!
//! Storage location: `~/.local/share/favsites/` (configurable via `Config`)
//!
//! Files:
//! - `bookmarks.json` - JSON array of bookmark records
//! - `bookmarks.json.corrupt`, `bookmarks.json.corrupt.1`, ... - copies of
//!   unparseable slots, one per distinct content

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use crate::config::Config;
use crate::models::Bookmark;

/// Persistence layer for the bookmark collection
///
/// The whole collection is rewritten on every save.
#[derive(Debug, Clone)]
pub struct JsonPersistence {
    path: PathBuf,
    backup_path: PathBuf,
}

impl JsonPersistence {
    /// Create a persistence handler for the slot described by `config`
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.bookmarks_path(),
            backup_path: config.corrupt_backup_path(),
        }
    }

    /// Path of the slot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full collection using atomic write
    pub fn save(&self, bookmarks: &[Bookmark]) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(bookmarks)?;
        atomic_write(&self.path, &bytes)?;
        debug!("Saved {} bookmarks to {:?}", bookmarks.len(), self.path);
        Ok(())
    }

    /// Load the collection from disk
    ///
    /// Returns `None` if the slot file doesn't exist. If the file exists but
    /// can't be parsed, its bytes are copied aside and
    /// `StorageError::Corrupt` is returned.
    pub fn load(&self) -> StorageResult<Option<Vec<Bookmark>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice::<Vec<Bookmark>>(&bytes)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                backup: self.back_up(&bytes),
                details: e.to_string(),
            })
    }

    /// Load the collection, falling back to empty on any failure
    ///
    /// Missing, unreadable and malformed slots all yield an empty collection.
    pub fn load_or_empty(&self) -> Vec<Bookmark> {
        match self.load() {
            Ok(Some(bookmarks)) => bookmarks,
            Ok(None) => {
                debug!("No bookmarks file at {:?}, starting empty", self.path);
                Vec::new()
            }
            Err(e) => {
                match e.recovery_suggestion() {
                    Some(hint) => warn!("Ignoring stored bookmarks: {} {}", e, hint),
                    None => warn!("Ignoring stored bookmarks: {}", e),
                }
                Vec::new()
            }
        }
    }

    /// Keep a copy of unparseable slot contents
    ///
    /// Earlier backups are never overwritten. If one already holds exactly
    /// these bytes it is reused, otherwise the first free numbered name is
    /// taken. Returns `None` when no copy could be written.
    fn back_up(&self, bytes: &[u8]) -> Option<PathBuf> {
        let mut n = 0;
        loop {
            let candidate = numbered(&self.backup_path, n);
            match fs::read(&candidate) {
                Ok(existing) if existing == bytes => return Some(candidate),
                Ok(_) => n += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return match fs::write(&candidate, bytes) {
                        Ok(()) => {
                            warn!("Copied unreadable bookmarks to {:?}", candidate);
                            Some(candidate)
                        }
                        Err(e) => {
                            warn!("Could not back up unreadable slot to {:?}: {}", candidate, e);
                            None
                        }
                    };
                }
                Err(e) => {
                    warn!("Could not inspect backup {:?}: {}", candidate, e);
                    return None;
                }
            }
        }
    }
}

/// `base` for 0, `base.N` otherwise
fn numbered(base: &Path, n: usize) -> PathBuf {
    if n == 0 {
        return base.to_path_buf();
    }
    let mut name = OsString::from(base.as_os_str());
    name.push(format!(".{}", n));
    PathBuf::from(name)
}

fn write_err(path: &Path) -> impl FnOnce(io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Write { path, source }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err(parent))?;
    }

    let temp_path = path.with_extension("json.tmp");

    let mut file = File::create(&temp_path).map_err(write_err(&temp_path))?;
    file.write_all(data).map_err(write_err(&temp_path))?;
    file.sync_all().map_err(write_err(&temp_path))?;

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(&test_config(&temp_dir));

        // Initially no slot
        assert!(persistence.load().unwrap().is_none());

        let bookmarks = vec![
            Bookmark::new("Rust", "https://rust-lang.org", Some("https://img/rust.png".into())),
            Bookmark::new("Docs", "https://docs.rs", None),
        ];
        persistence.save(&bookmarks).unwrap();
        assert!(persistence.path().exists());

        let loaded = persistence.load().unwrap().unwrap();
        assert_eq!(loaded, bookmarks);
    }

    #[test]
    fn test_save_empty_collection_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(&test_config(&temp_dir));

        persistence
            .save(&[Bookmark::new("A", "http://a", None)])
            .unwrap();
        persistence.save(&[]).unwrap();

        let loaded = persistence.load().unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(&test_config(&temp_dir));

        persistence
            .save(&[Bookmark::new("A", "http://a", None)])
            .unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["bookmarks.json".to_string()]);
    }

    #[test]
    fn test_malformed_slot_is_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = JsonPersistence::new(&config);

        fs::write(config.bookmarks_path(), "{not json").unwrap();

        match persistence.load().unwrap_err() {
            StorageError::Corrupt { backup, .. } => {
                assert_eq!(backup, Some(config.corrupt_backup_path()));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(
            fs::read_to_string(config.corrupt_backup_path()).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn test_second_corruption_keeps_first_backup() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = JsonPersistence::new(&config);

        fs::write(config.bookmarks_path(), "first-corrupt").unwrap();
        assert!(persistence.load_or_empty().is_empty());
        // Loading the same bad file again reuses its backup
        assert!(persistence.load_or_empty().is_empty());

        fs::write(config.bookmarks_path(), "second-corrupt").unwrap();
        assert!(persistence.load_or_empty().is_empty());

        let first = config.corrupt_backup_path();
        let second = temp_dir.path().join("bookmarks.json.corrupt.1");
        assert_eq!(fs::read_to_string(&first).unwrap(), "first-corrupt");
        assert_eq!(fs::read_to_string(&second).unwrap(), "second-corrupt");
        assert!(!temp_dir.path().join("bookmarks.json.corrupt.2").exists());
    }

    #[test]
    fn test_failed_backup_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = JsonPersistence::new(&config);

        fs::write(config.bookmarks_path(), "{not json").unwrap();
        // A directory in the way makes the copy impossible
        fs::create_dir(config.corrupt_backup_path()).unwrap();

        let err = persistence.load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { backup: None, .. }));
        assert!(err.to_string().contains("No backup copy"));
    }

    #[test]
    fn test_load_or_empty_fails_safe() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = JsonPersistence::new(&config);

        // Missing file
        assert!(persistence.load_or_empty().is_empty());

        // Valid JSON with the wrong shape
        fs::write(config.bookmarks_path(), r#"{"bookmarks": []}"#).unwrap();
        assert!(persistence.load_or_empty().is_empty());

        // Ids must be UUID strings
        fs::write(
            config.bookmarks_path(),
            r#"[{"id":0.42,"name":"A","link":"http://a","image":""}]"#,
        )
        .unwrap();
        assert!(persistence.load_or_empty().is_empty());
    }
}
