//! Image host client
//!
//! Profile pictures and message images arrive as base64 data URIs and are
//! forwarded to an external image host, which returns the canonical URL
//! stored on the user or message record.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::Config;

/// Client for the configured image host
#[derive(Clone)]
pub struct ImageUploader {
    client: reqwest::Client,
    upload_url: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

impl ImageUploader {
    /// Create an uploader from application config
    pub fn new(config: &Config) -> Self {
        Self::with_endpoint(
            config.image_upload_url.clone(),
            config.image_upload_api_key.clone(),
        )
    }

    /// Create an uploader for an explicit endpoint
    pub fn with_endpoint(upload_url: Option<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            upload_url,
            api_key,
        }
    }

    /// Whether an image host is configured
    pub fn is_configured(&self) -> bool {
        self.upload_url.is_some()
    }

    /// Upload an image and return its canonical URL
    pub async fn upload(&self, data: &str) -> Result<String, UploadError> {
        let url = self.upload_url.as_deref().ok_or(UploadError::NotConfigured)?;

        let mut request = self.client.post(url).json(&json!({ "file": data }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = ?e, "Image upload request failed");
            UploadError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, "Image host rejected upload");
            return Err(UploadError::Status(status.as_u16()));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let image_url = body.secure_url.or(body.url).ok_or(UploadError::MissingUrl)?;
        tracing::debug!(image_url = %image_url, "Image uploaded");

        Ok(image_url)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Image host is not configured")]
    NotConfigured,
    #[error("Image host request failed: {0}")]
    Request(String),
    #[error("Image host returned status {0}")]
    Status(u16),
    #[error("Image host response did not include a URL")]
    MissingUrl,
}
