//! Layer descriptors and preview options injected by the hosting page.
//!
//! The JSON shape is the one produced by the layer serializers of the admin backend, so field
//! names are camelCase and most blocks are optional. Fields the preview does not use (`name`,
//! `params`, `legendConfig`, ...) are accepted and ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

use crate::error::PreviewError;
use crate::popup::PopupField;

/// Key of the timestamps array in a tile-JSON response when the descriptor does not name one.
pub const DEFAULT_TIMESTAMPS_KEY: &str = "timestamps";

/// Everything the preview widgets need from the hosting page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOptions {
    /// Layers of the previewed dataset.
    #[serde(default)]
    pub data_layers: Vec<LayerDescriptor>,
    /// Icons referenced by vector layer styles.
    #[serde(default)]
    pub icon_images: Vec<IconImage>,
}

impl PreviewOptions {
    /// Parses the options from their JSON representation.
    pub fn from_json(json: &str) -> Result<Self, PreviewError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the layer with the given id.
    pub fn find_layer(&self, id: &str) -> Option<&LayerDescriptor> {
        self.data_layers.iter().find(|layer| layer.id == id)
    }
}

/// Named icon image to be registered with the map before any layer uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconImage {
    /// Name under which style layers reference the icon.
    pub name: String,
    /// Where to load the image from.
    pub url: String,
}

/// Description of a single data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    /// Layer id. Also used as the map source and layer id.
    pub id: String,
    /// Tile source and rendering configuration.
    pub layer_config: LayerConfig,
    /// Endpoint listing the available timestamps of a time-enabled layer.
    #[serde(default)]
    pub tile_json_url: Option<String>,
    /// Key of the timestamps array in the `tile_json_url` response.
    #[serde(default)]
    pub timestamps_response_object_key: Option<String>,
    /// Parameters the user can select, including the time parameter.
    #[serde(default)]
    pub params_selector_config: Option<Vec<ParamSelector>>,
    /// Feature interaction configuration (popups).
    #[serde(default)]
    pub interaction_config: Option<InteractionConfig>,
}

impl LayerDescriptor {
    /// First tile URL template of the layer source.
    pub fn tile_template(&self) -> Result<&str, PreviewError> {
        self.layer_config
            .source
            .tiles
            .first()
            .map(String::as_str)
            .ok_or_else(|| PreviewError::MissingTileTemplate(self.id.clone()))
    }

    /// Key of the timestamps array in the tile-JSON response.
    pub fn timestamps_key(&self) -> &str {
        self.timestamps_response_object_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or(DEFAULT_TIMESTAMPS_KEY)
    }

    /// Name of the URL query parameter carrying the selected time, if the layer declares one.
    pub fn time_url_param(&self) -> Option<&str> {
        self.params_selector_config
            .as_ref()?
            .iter()
            .find(|selector| selector.key == "time" && selector.kind == "datetime")?
            .url_param
            .as_deref()
            .filter(|param| !param.is_empty())
    }

    /// Rendering sub-layers, empty if none are declared.
    pub fn render_layers(&self) -> &[RenderLayer] {
        self.layer_config
            .render
            .as_ref()
            .map(|render| render.layers.as_slice())
            .unwrap_or_default()
    }

    /// Fields shown in feature popups, or `None` if the layer has no popup configuration.
    pub fn popup_fields(&self) -> Option<Vec<PopupField>> {
        let output = self.interaction_config.as_ref()?.output.as_ref()?;
        Some(output.iter().map(PopupField::from).collect())
    }
}

/// Source and rendering configuration of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Tile source.
    pub source: SourceConfig,
    /// Vector rendering sub-layers.
    #[serde(default)]
    pub render: Option<RenderConfig>,
}

/// Tile source of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Tile URL templates.
    pub tiles: Vec<String>,
    /// Other source properties (`type`, `minzoom`, `bounds`, ...).
    #[serde(flatten)]
    pub extra: JsonMap<String, Value>,
}

/// Rendering block of a vector layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Style layers drawn from the layer's source.
    #[serde(default)]
    pub layers: Vec<RenderLayer>,
}

/// A style layer declared by a vector layer descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderLayer {
    /// Style layer type: `circle`, `line`, `fill`, `symbol`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// All other style properties, copied verbatim into the map layer.
    #[serde(flatten)]
    pub spec: JsonMap<String, Value>,
}

/// A user selectable URL parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSelector {
    /// Logical parameter name.
    pub key: String,
    /// Selector type, e.g. `datetime`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Name of the query parameter the value is sent as.
    #[serde(default)]
    pub url_param: Option<String>,
    /// Other selector properties (`sentence`, `options`, `dateFormat`, ...).
    #[serde(flatten)]
    pub extra: JsonMap<String, Value>,
}

/// Feature interaction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Properties to show in the popup, in display order.
    #[serde(default)]
    pub output: Option<Vec<OutputField>>,
    /// Other interaction properties.
    #[serde(flatten)]
    pub extra: JsonMap<String, Value>,
}

/// Popup entry: a feature property and the label it is shown under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputField {
    /// Feature property name.
    pub column: String,
    /// Display label.
    #[serde(default)]
    pub property: Option<String>,
}
