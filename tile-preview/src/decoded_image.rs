//! Raw RGBA image registered with the map style.

use std::fmt;

/// Decoded RGBA8 image.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl DecodedImage {
    /// Creates an image from raw RGBA8 pixels.
    ///
    /// Returns `None` if the buffer size does not match the dimensions.
    pub fn from_raw(bytes: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if bytes.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }

        Some(Self {
            bytes,
            width,
            height,
        })
    }

    /// Decodes a PNG or JPEG image.
    #[cfg(feature = "image")]
    pub fn decode(bytes: &[u8]) -> Result<Self, crate::error::PreviewError> {
        use image::GenericImageView;

        let decoded = image::load_from_memory(bytes)
            .map_err(|err| crate::error::PreviewError::ImageDecode(err.to_string()))?;
        let (width, height) = decoded.dimensions();

        Ok(Self {
            bytes: decoded.into_rgba8().into_raw(),
            width,
            height,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 pixel data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
