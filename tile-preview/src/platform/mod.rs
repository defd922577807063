//! Access to the network and image decoding.
//!
//! The preview widgets never talk to HTTP or image libraries directly. They go through a
//! [`PlatformService`], which lets the host (and tests) decide how resources are loaded.

use bytes::Bytes;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::decoded_image::DecodedImage;
use crate::error::PreviewError;

#[cfg(not(target_arch = "wasm32"))]
mod native;

#[cfg(not(target_arch = "wasm32"))]
pub use native::NativePlatformService;

/// Loads remote resources for the preview widgets.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait PlatformService: MaybeSend + MaybeSync {
    /// Loads the body of a `GET` request to `url`.
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, PreviewError>;

    /// Decodes PNG or JPEG bytes.
    async fn decode_image(&self, bytes: Bytes) -> Result<DecodedImage, PreviewError>;

    /// Loads and decodes an image.
    async fn load_image(&self, url: &str) -> Result<DecodedImage, PreviewError> {
        let bytes = self.load_bytes_from_url(url).await?;
        self.decode_image(bytes).await
    }
}
