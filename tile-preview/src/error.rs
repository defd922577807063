//! Error type shared by the preview widgets.

use thiserror::Error;

/// Error returned by map, platform and preview operations.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Tile or endpoint URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request failed before a response was received, or returned an error status.
    #[error("network error: {0}")]
    Network(String),

    /// Remote resource does not exist (HTTP 404).
    #[error("resource not found")]
    NotFound,

    /// Response body is not valid JSON or does not match the expected shape.
    #[error("failed to decode json: {0}")]
    Json(#[from] serde_json::Error),

    /// Image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    /// Tile-JSON document does not contain the requested timestamps key.
    #[error("response has no `{0}` key")]
    MissingResponseKey(String),

    /// No layer with the given id in the preview options.
    #[error("unknown layer `{0}`")]
    UnknownLayer(String),

    /// Layer descriptor has an empty `tiles` list.
    #[error("layer `{0}` has no tile url template")]
    MissingTileTemplate(String),

    /// Source with the same id is already registered in the map style.
    #[error("source `{0}` already exists")]
    DuplicateSource(String),

    /// Layer with the same id is already registered in the map style.
    #[error("layer `{0}` already exists")]
    DuplicateLayer(String),

    /// Source id is not registered in the map style.
    #[error("source `{0}` not found")]
    SourceNotFound(String),

    /// Layer id is not registered in the map style.
    #[error("layer `{0}` not found")]
    LayerNotFound(String),

    /// Source cannot be removed while a layer still renders it.
    #[error("source `{source_id}` is used by layer `{layer_id}`")]
    SourceInUse {
        /// Source that was to be removed.
        source_id: String,
        /// First layer still referencing the source.
        layer_id: String,
    },

    /// The renderer dropped the ready signal without ever firing it.
    #[error("map was closed before it became ready")]
    MapClosed,
}
