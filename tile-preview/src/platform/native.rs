use bytes::Bytes;
use reqwest::{Client, StatusCode};

use super::PlatformService;
use crate::decoded_image::DecodedImage;
use crate::error::PreviewError;

/// Platform service for native targets, backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct NativePlatformService {
    client: Client,
}

impl NativePlatformService {
    /// Creates a service with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service using the given HTTP client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PlatformService for NativePlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, PreviewError> {
        log::debug!("Loading {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PreviewError::Network(err.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            log::warn!("Resource not found (404): {url}");
            return Err(PreviewError::NotFound);
        }

        let response = response
            .error_for_status()
            .map_err(|err| PreviewError::Network(err.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|err| PreviewError::Network(err.to_string()))?;

        log::debug!("Loaded {} bytes from {url}", bytes.len());
        Ok(bytes)
    }

    async fn decode_image(&self, bytes: Bytes) -> Result<DecodedImage, PreviewError> {
        decode_with_image_crate(bytes)
    }
}

#[cfg(feature = "image")]
fn decode_with_image_crate(bytes: Bytes) -> Result<DecodedImage, PreviewError> {
    DecodedImage::decode(&bytes)
}

#[cfg(not(feature = "image"))]
fn decode_with_image_crate(_bytes: Bytes) -> Result<DecodedImage, PreviewError> {
    Err(PreviewError::ImageDecode(
        "image decoding requires the `image` feature".to_string(),
    ))
}
