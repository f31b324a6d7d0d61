//! Bookmark store
//!
//! The `Store` owns the in-memory bookmark collection and mirrors it to the
//! JSON slot on disk.
//!
//! ## Lifecycle
//!
//! The slot is read once when the store opens. A missing or malformed slot
//! yields an empty collection. Every successful mutation rewrites the whole
//! slot before returning; if that write fails the mutation is undone so the
//! collection and the slot never disagree.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open_with_config(Config::load()?)?;
//!
//! // Add a bookmark (awaits the preview lookup)
//! let bookmark = store.add("Rust", "https://rust-lang.org", &lookup).await?;
//!
//! // First page of eight
//! let cards = store.page(1, 8);
//! ```

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{validate, StoreError};
use crate::models::Bookmark;
use crate::pagination;
use crate::preview::{resolve_image, PreviewLookup};
use crate::storage::JsonPersistence;

/// Owned bookmark collection with its persistent mirror
pub struct Store {
    /// Bookmarks in insertion order
    bookmarks: Vec<Bookmark>,
    /// Slot persistence handler
    persistence: JsonPersistence,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store with a specific configuration
    ///
    /// Never fails because of slot contents; only configuration problems
    /// are reported.
    pub fn open_with_config(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", config.data_dir))?;

        let persistence = JsonPersistence::new(&config);
        let bookmarks = dedup_ids(persistence.load_or_empty());
        info!(
            "Loaded {} bookmarks from {:?}",
            bookmarks.len(),
            persistence.path()
        );

        Ok(Self {
            bookmarks,
            persistence,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All bookmarks in insertion order
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Get a bookmark by ID
    pub fn get(&self, id: Uuid) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    /// Bookmarks whose ID starts with `prefix` (hyphenated form)
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Bookmark> {
        let prefix = prefix.to_lowercase();
        self.bookmarks
            .iter()
            .filter(|b| b.id.to_string().starts_with(&prefix))
            .collect()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.bookmarks.iter().position(|b| b.id == id)
    }

    // ==================== Mutations ====================

    /// Add a new bookmark
    ///
    /// Validates the fields, resolves the preview image for `link` (no image
    /// on lookup failure), appends the record and persists the collection.
    pub async fn add<L>(&mut self, name: &str, link: &str, lookup: &L) -> Result<Bookmark, StoreError>
    where
        L: PreviewLookup + ?Sized,
    {
        validate(name, link)?;
        let (name, link) = (name.trim(), link.trim());

        let image = resolve_image(lookup, link).await;
        let mut bookmark = Bookmark::new(name, link, image);
        while self.position(bookmark.id).is_some() {
            bookmark.id = Uuid::new_v4();
        }

        self.bookmarks.push(bookmark.clone());
        if let Err(e) = self.persistence.save(&self.bookmarks) {
            self.bookmarks.pop();
            return Err(e.into());
        }

        info!("Added bookmark {} ({})", bookmark.id, bookmark.link);
        Ok(bookmark)
    }

    /// Replace the name, link and image of an existing bookmark
    ///
    /// The image is re-resolved from the new link. ID and position are kept.
    pub async fn edit<L>(
        &mut self,
        id: Uuid,
        name: &str,
        link: &str,
        lookup: &L,
    ) -> Result<Bookmark, StoreError>
    where
        L: PreviewLookup + ?Sized,
    {
        validate(name, link)?;
        if self.position(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        let (name, link) = (name.trim(), link.trim());

        let image = resolve_image(lookup, link).await;

        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let updated = Bookmark::with_id(id, name, link, image);
        let previous = std::mem::replace(&mut self.bookmarks[index], updated.clone());
        if let Err(e) = self.persistence.save(&self.bookmarks) {
            self.bookmarks[index] = previous;
            return Err(e.into());
        }

        info!("Updated bookmark {}", id);
        Ok(updated)
    }

    /// Remove a bookmark and persist, even if the collection becomes empty
    ///
    /// Callers gate this behind an explicit confirmation.
    pub fn delete(&mut self, id: Uuid) -> Result<Bookmark, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;

        let removed = self.bookmarks.remove(index);
        if let Err(e) = self.persistence.save(&self.bookmarks) {
            self.bookmarks.insert(index, removed);
            return Err(e.into());
        }

        info!("Deleted bookmark {}", id);
        Ok(removed)
    }

    // ==================== Pagination ====================

    /// Bookmarks on 1-indexed `page`
    pub fn page(&self, page: usize, page_size: usize) -> &[Bookmark] {
        pagination::page_slice(&self.bookmarks, page, page_size)
    }

    /// Number of pages, never less than 1
    pub fn total_pages(&self, page_size: usize) -> usize {
        pagination::total_pages(self.bookmarks.len(), page_size)
    }
}

/// Drop records whose ID already appeared earlier in the list
fn dedup_ids(bookmarks: Vec<Bookmark>) -> Vec<Bookmark> {
    let mut seen = HashSet::new();
    let before = bookmarks.len();
    let unique: Vec<Bookmark> = bookmarks
        .into_iter()
        .filter(|b| seen.insert(b.id))
        .collect();
    if unique.len() != before {
        warn!(
            "Dropped {} bookmarks with duplicate IDs",
            before - unique.len()
        );
    }
    unique
}
