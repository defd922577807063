//! Style document of the preview map: tile sources and the layers drawing them.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map as JsonMap, Value};

const CARTO_LIGHT_TILES: [&str; 4] = [
    "https://a.basemaps.cartocdn.com/light_all/{z}/{x}/{y}@2x.png",
    "https://b.basemaps.cartocdn.com/light_all/{z}/{x}/{y}@2x.png",
    "https://c.basemaps.cartocdn.com/light_all/{z}/{x}/{y}@2x.png",
    "https://d.basemaps.cartocdn.com/light_all/{z}/{x}/{y}@2x.png",
];
const WIKIMEDIA_TILES: &str = "https://maps.wikimedia.org/osm-intl/{z}/{x}/{y}.png";

/// Kind of tiles a source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Image tiles.
    Raster,
    /// Vector (MVT) tiles.
    Vector,
}

/// Tile source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    /// Tile format.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Tile URL templates. Tiles are spread over the templates round-robin.
    pub tiles: Vec<String>,
}

impl Source {
    /// Raster source with the given templates.
    pub fn raster(tiles: Vec<String>) -> Self {
        Self {
            kind: SourceKind::Raster,
            tiles,
        }
    }

    /// Vector source with the given templates.
    pub fn vector(tiles: Vec<String>) -> Self {
        Self {
            kind: SourceKind::Vector,
            tiles,
        }
    }
}

/// A style layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleLayer {
    /// Unique layer id.
    pub id: String,
    /// Layer type (`raster`, `circle`, `line`, `fill`, `symbol`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Source the layer draws.
    pub source: String,
    /// Minimum zoom level the layer is shown at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    /// Maximum zoom level the layer is shown at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    /// Remaining style properties (`paint`, `layout`, `filter`, `source-layer`, ...).
    #[serde(flatten)]
    pub spec: JsonMap<String, Value>,
}

impl StyleLayer {
    /// Creates a layer of the given type drawing `source`.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            source: source.into(),
            minzoom: None,
            maxzoom: None,
            spec: JsonMap::new(),
        }
    }

    /// Raster layer drawing `source`.
    pub fn raster(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(id, "raster", source)
    }

    /// Sets the zoom range of the layer.
    pub fn with_zoom_range(mut self, minzoom: f64, maxzoom: f64) -> Self {
        self.minzoom = Some(minzoom);
        self.maxzoom = Some(maxzoom);
        self
    }

    /// Adds style properties. `id`, `type` and `source` entries are ignored.
    pub fn with_spec(mut self, spec: &JsonMap<String, Value>) -> Self {
        for (key, value) in spec {
            match key.as_str() {
                "id" | "type" | "source" => {}
                "minzoom" => self.minzoom = value.as_f64(),
                "maxzoom" => self.maxzoom = value.as_f64(),
                _ => {
                    self.spec.insert(key.clone(), value.clone());
                }
            }
        }
        self
    }
}

/// Style document: sources and the ordered list of layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    /// Style specification version.
    pub version: u8,
    /// Sources by id.
    pub sources: BTreeMap<String, Source>,
    /// Layers, bottom to top.
    pub layers: Vec<StyleLayer>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            version: 8,
            sources: BTreeMap::new(),
            layers: vec![],
        }
    }
}

impl Style {
    /// Basemap used by the preview widgets: light Carto tiles with a Wikimedia source available.
    pub fn default_basemap() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            "carto-light".to_string(),
            Source::raster(CARTO_LIGHT_TILES.iter().map(|t| t.to_string()).collect()),
        );
        sources.insert(
            "wikimedia".to_string(),
            Source::raster(vec![WIKIMEDIA_TILES.to_string()]),
        );

        Self {
            version: 8,
            sources,
            layers: vec![
                StyleLayer::raster("carto-light-layer", "carto-light").with_zoom_range(0.0, 22.0)
            ],
        }
    }
}
