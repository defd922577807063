#![allow(dead_code)]

use std::sync::Mutex;

use ahash::HashMap;
use bytes::Bytes;
use serde_json::Value;
use tile_preview::map::Style;
use tile_preview::{DecodedImage, Map, MapOptions, PlatformService, PreviewError, PreviewOptions};

/// Serves canned responses and records every requested URL.
#[derive(Default)]
pub struct MockPlatform {
    responses: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MockPlatform {
    pub fn with_response(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), body.into());
        self
    }

    pub fn with_json(self, url: &str, body: Value) -> Self {
        self.with_response(url, body.to_string())
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PlatformService for MockPlatform {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, PreviewError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .map(|body| Bytes::from(body.clone()))
            .ok_or(PreviewError::NotFound)
    }

    async fn decode_image(&self, bytes: Bytes) -> Result<DecodedImage, PreviewError> {
        DecodedImage::from_raw(bytes.to_vec(), 1, 1)
            .ok_or_else(|| PreviewError::ImageDecode("not a 1x1 rgba image".to_string()))
    }
}

pub fn ready_map() -> Map {
    let (map, ready) = Map::new(MapOptions::default(), Style::default_basemap());
    ready.ready();
    map
}

pub fn options(json: Value) -> PreviewOptions {
    serde_json::from_value(json).unwrap()
}
