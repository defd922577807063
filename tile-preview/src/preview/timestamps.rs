//! Loading the timestamps of time-enabled layers.

use serde_json::Value;

use super::sequence::RequestToken;
use crate::error::PreviewError;
use crate::platform::PlatformService;

/// Fetches `tile_json_url` and returns the array of timestamps stored under `response_key`.
///
/// Network and decoding errors are returned as they are. Nothing is retried.
pub async fn load_timestamps<P>(
    platform: &P,
    tile_json_url: &str,
    response_key: &str,
) -> Result<Vec<String>, PreviewError>
where
    P: PlatformService + ?Sized,
{
    log::debug!("Loading timestamps from {tile_json_url}");
    let bytes = platform.load_bytes_from_url(tile_json_url).await?;

    let mut document: Value = serde_json::from_slice(&bytes)?;
    let timestamps = document
        .get_mut(response_key)
        .map(Value::take)
        .ok_or_else(|| PreviewError::MissingResponseKey(response_key.to_string()))?;

    let timestamps: Vec<String> = serde_json::from_value(timestamps)?;
    log::debug!(
        "Loaded {} timestamps from {tile_json_url}",
        timestamps.len()
    );

    Ok(timestamps)
}

/// A started layer selection, waiting for its timestamps (if the layer has any).
///
/// Produced by `begin_layer_selection` of a preview widget. Resolving it does not borrow the
/// widget, so several selections can be in flight at once; only the latest one is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSelection {
    pub(crate) token: RequestToken,
    pub(crate) layer_id: String,
    pub(crate) request: Option<TimestampsRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TimestampsRequest {
    pub(crate) url: String,
    pub(crate) response_key: String,
}

impl LayerSelection {
    /// Selected layer id.
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// Whether resolving the selection issues a request.
    pub fn needs_fetch(&self) -> bool {
        self.request.is_some()
    }

    /// Loads the layer timestamps. Layers without a tile-JSON endpoint resolve immediately.
    pub async fn resolve<P>(self, platform: &P) -> Result<ResolvedSelection, PreviewError>
    where
        P: PlatformService + ?Sized,
    {
        let timestamps = match &self.request {
            Some(request) => {
                Some(load_timestamps(platform, &request.url, &request.response_key).await?)
            }
            None => None,
        };

        Ok(ResolvedSelection {
            token: self.token,
            layer_id: self.layer_id,
            timestamps,
        })
    }
}

/// A layer selection with its timestamps loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub(crate) token: RequestToken,
    pub(crate) layer_id: String,
    pub(crate) timestamps: Option<Vec<String>>,
}

impl ResolvedSelection {
    /// Selected layer id.
    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    /// Loaded timestamps, `None` if the layer is not time-enabled.
    pub fn timestamps(&self) -> Option<&[String]> {
        self.timestamps.as_deref()
    }
}
