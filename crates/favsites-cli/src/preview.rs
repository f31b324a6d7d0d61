//! Link-preview HTTP client
//!
//! Resolves a preview image for a URL via a link-preview service
//! (`GET <endpoint>?key=<api key>&q=<url>`, JSON response with an `image`
//! field).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use favsites_core::{Config, NoPreview, PreviewError, PreviewLookup};

/// Response body of the preview service (only the field we use)
#[derive(Debug, Deserialize)]
struct PreviewResponse {
    #[serde(default)]
    image: Option<String>,
}

/// reqwest-backed `PreviewLookup`
pub struct LinkPreviewClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl LinkPreviewClient {
    /// Build a client for `endpoint` with the given key and timeout
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("favsites/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(client, endpoint, api_key))
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Build the GET request for `link`
    fn request(&self, link: &str) -> reqwest::RequestBuilder {
        self.client
            .get(&self.endpoint)
            .query(&[("key", self.api_key.as_str()), ("q", link)])
    }
}

#[async_trait]
impl PreviewLookup for LinkPreviewClient {
    async fn lookup(&self, link: &str) -> Result<String, PreviewError> {
        debug!("Looking up preview for {}", link);

        let response = self
            .request(link)
            .send()
            .await
            .map_err(|e| PreviewError::Transport(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PreviewError::Transport(Box::new(e)))?;
        parse_preview(&body)
    }
}

/// Extract the image URL from a preview response body
fn parse_preview(body: &str) -> Result<String, PreviewError> {
    let response: PreviewResponse =
        serde_json::from_str(body).map_err(|e| PreviewError::Decode(e.to_string()))?;
    Ok(response.image.unwrap_or_default())
}

/// Pick the lookup to use for this configuration
///
/// Without an API key every lookup yields no image.
pub fn lookup_from_config(config: &Config) -> Box<dyn PreviewLookup> {
    let Some(api_key) = config.preview_api_key.clone() else {
        debug!("No preview API key configured; previews disabled");
        return Box::new(NoPreview);
    };

    match LinkPreviewClient::new(
        config.preview_endpoint.clone(),
        api_key,
        Duration::from_secs(config.preview_timeout_secs),
    ) {
        Ok(client) => Box::new(client),
        Err(e) => {
            warn!("Previews disabled: {:#}", e);
            Box::new(NoPreview)
        }
    }
}
