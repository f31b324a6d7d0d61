//! favsites Core Library
//!
//! This crate provides the core functionality for favsites, a local
//! collection of favorite websites with preview images.
//!
//! # Architecture
//!
//! - **Store**: owns the bookmark collection; every mutation is mirrored to
//!   a JSON file before the call returns
//! - **PreviewLookup**: pluggable image lookup awaited inside add/edit
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open_with_config(Config::load()?)?;
//!
//! // Add a bookmark
//! let bookmark = store.add("Rust", "https://rust-lang.org", &NoPreview).await?;
//!
//! // Query a page of cards
//! let cards = store.page(1, 8);
//! ```
//!
//! # Modules
//!
//! - `store`: Bookmark collection (main entry point)
//! - `models`: The bookmark record
//! - `storage`: JSON slot persistence
//! - `preview`: Preview image lookup seam
//! - `pagination`: Page arithmetic and the `Pager` cursor
//! - `config`: Application configuration
//! - `error`: Validation, store and preview errors

pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod preview;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{PreviewError, StoreError, ValidationError};
pub use models::Bookmark;
pub use pagination::Pager;
pub use preview::{NoPreview, PreviewLookup};
pub use storage::{JsonPersistence, StorageError};
pub use store::Store;
