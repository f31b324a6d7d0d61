//! Data models for favsites
//!
//! Defines the `Bookmark` record stored in the collection and mirrored to
//! the JSON slot on disk.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A saved website with its preview image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    /// Unique identifier
    pub id: Uuid,
    /// Display name entered by the user
    pub name: String,
    /// The URL
    pub link: String,
    /// Preview image URL resolved from the link, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Bookmark {
    /// Create a new bookmark with a freshly generated ID
    pub fn new(name: impl Into<String>, link: impl Into<String>, image: Option<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, link, image)
    }

    /// Create a bookmark with a specific ID (for loading from storage)
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        link: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            link: link.into(),
            image: normalize_image(image),
        }
    }

    /// Whether a preview image is available
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Short form of the ID for listings
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Map empty or whitespace-only image strings to `None`
pub fn normalize_image(image: Option<String>) -> Option<String> {
    image
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_new() {
        let bookmark = Bookmark::new("Rust", "https://rust-lang.org", None);
        assert_eq!(bookmark.name, "Rust");
        assert_eq!(bookmark.link, "https://rust-lang.org");
        assert!(bookmark.image.is_none());
        assert!(!bookmark.has_image());
    }

    #[test]
    fn test_bookmark_ids_are_unique() {
        let a = Bookmark::new("A", "http://a", None);
        let b = Bookmark::new("A", "http://a", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_bookmark_with_id() {
        let id = Uuid::new_v4();
        let bookmark = Bookmark::with_id(id, "A", "http://a", Some("img".to_string()));
        assert_eq!(bookmark.id, id);
        assert_eq!(bookmark.image.as_deref(), Some("img"));
    }

    #[test]
    fn test_empty_image_normalized() {
        let bookmark = Bookmark::new("A", "http://a", Some("   ".to_string()));
        assert!(bookmark.image.is_none());
        assert_eq!(normalize_image(Some(" x ".to_string())), Some("x".to_string()));
    }

    #[test]
    fn test_short_id() {
        let bookmark = Bookmark::new("A", "http://a", None);
        assert_eq!(bookmark.short_id().len(), 8);
        assert!(bookmark.id.to_string().starts_with(&bookmark.short_id()));
    }

    #[test]
    fn test_serialization_omits_missing_image() {
        let bookmark = Bookmark::new("A", "http://a", None);
        let json = serde_json::to_string(&bookmark).unwrap();
        assert!(!json.contains("image"));

        let deserialized: Bookmark = serde_json::from_str(&json).unwrap();
        assert_eq!(bookmark, deserialized);
    }

    #[test]
    fn test_deserialize_null_image() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"id":"{}","name":"A","link":"http://a","image":null}}"#, id);
        let bookmark: Bookmark = serde_json::from_str(&json).unwrap();
        assert_eq!(bookmark.id, id);
        assert!(bookmark.image.is_none());
    }
}
