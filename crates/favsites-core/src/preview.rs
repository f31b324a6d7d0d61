//! Preview image lookup
//!
//! The store asks a `PreviewLookup` for a representative image whenever a
//! bookmark is added or its link changes. Lookups are allowed to fail; the
//! bookmark is then stored without an image.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::PreviewError;
use crate::models::normalize_image;

/// Resolves a preview image URL for a link
#[async_trait]
pub trait PreviewLookup: Send + Sync {
    /// Look up the preview image for `link`
    async fn lookup(&self, link: &str) -> Result<String, PreviewError>;
}

/// Lookup used when no preview service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreview;

#[async_trait]
impl PreviewLookup for NoPreview {
    async fn lookup(&self, _link: &str) -> Result<String, PreviewError> {
        Err(PreviewError::MissingApiKey)
    }
}

/// Resolve the image for `link`, mapping any failure to `None`
pub async fn resolve_image<L>(lookup: &L, link: &str) -> Option<String>
where
    L: PreviewLookup + ?Sized,
{
    match lookup.lookup(link).await {
        Ok(image) => normalize_image(Some(image)),
        Err(PreviewError::MissingApiKey) => {
            debug!("No preview API key configured, skipping lookup for {}", link);
            None
        }
        Err(e) => {
            warn!("Preview lookup failed for {}: {}", link, e);
            None
        }
    }
}
