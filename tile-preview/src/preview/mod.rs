//! Map preview widgets for raster and vector tile layers.
//!
//! A widget owns the [`Map`], the layer descriptors of the previewed dataset and the two select
//! controls of the preview page (layer and timestamp). Nothing is cached between selections:
//! a layer change reloads the timestamps and re-creates the map layer, while a timestamp
//! change only rewrites the tile template of the active source.

use std::sync::Arc;

use crate::config::{LayerDescriptor, PreviewOptions};
use crate::error::PreviewError;
use crate::map::{ControlPosition, Map, NavigationControl};
use crate::platform::PlatformService;
use crate::tile_url::update_tile_url;

mod raster;
mod sequence;
mod timestamps;
mod vector;

pub use raster::RasterPreview;
pub use sequence::{RequestSequencer, RequestToken};
pub use timestamps::{load_timestamps, LayerSelection, ResolvedSelection};
pub use vector::{sublayer_id, ClickEvent, VectorPreview};

use timestamps::TimestampsRequest;

/// Query parameter the raster preview sends the selected time as.
pub const TIME_PARAM: &str = "time";

/// A `<select>` control.
///
/// Like its HTML counterpart, a select with options but no explicit selection has the first
/// option as its value. Empty option values count as no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectControl {
    options: Vec<String>,
    selected: Option<usize>,
}

impl SelectControl {
    /// Creates a control with the given options and nothing explicitly selected.
    pub fn new<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            selected: None,
        }
    }

    /// Current value.
    pub fn value(&self) -> Option<&str> {
        let index = self.selected.unwrap_or(0);
        self.options
            .get(index)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Selects the option with the given value. Returns `false` if there is no such option.
    pub fn select(&mut self, value: &str) -> bool {
        match self.options.iter().position(|option| option == value) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    /// Selects `value`, appending it as a new option if it is not listed.
    pub fn select_or_append(&mut self, value: &str) {
        if !self.select(value) {
            self.options.push(value.to_string());
            self.selected = Some(self.options.len() - 1);
        }
    }

    /// Replaces all options. The selection is reset.
    pub fn set_options<S: Into<String>>(&mut self, options: impl IntoIterator<Item = S>) {
        self.options = options.into_iter().map(Into::into).collect();
        self.selected = None;
    }

    /// Removes all options.
    pub fn clear(&mut self) {
        self.options.clear();
        self.selected = None;
    }

    /// Option values in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// Controls of the preview page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewControls {
    /// Layer selection.
    pub layer_select: SelectControl,
    /// Timestamp selection, populated from the layer's tile-JSON endpoint.
    pub timestamps_select: SelectControl,
    /// Whether the timestamp selection is shown.
    pub timestamps_visible: bool,
}

impl PreviewControls {
    /// Controls listing the layers of `options`, with `selected` (if any) preselected.
    ///
    /// The layer list starts with an empty placeholder, so the preview shows no layer until one
    /// is selected.
    pub fn for_layers(options: &PreviewOptions, selected: Option<&str>) -> Self {
        let mut layer_select = SelectControl::new(
            std::iter::once(String::new())
                .chain(options.data_layers.iter().map(|layer| layer.id.clone())),
        );
        if let Some(selected) = selected {
            layer_select.select(selected);
        }

        Self {
            layer_select,
            ..Default::default()
        }
    }
}

/// Lifecycle of the previewed layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveLayer {
    /// No layer has been set yet.
    #[default]
    Uninitialized,
    /// Layer was added to the map.
    LayerSet {
        /// Layer id.
        id: String,
    },
    /// Layer tiles were switched to another timestamp.
    LayerUpdated {
        /// Layer id.
        id: String,
        /// Timestamp the tiles show.
        time: String,
    },
}

impl ActiveLayer {
    /// Id of the active layer.
    pub fn layer_id(&self) -> Option<&str> {
        match self {
            Self::Uninitialized => None,
            Self::LayerSet { id } | Self::LayerUpdated { id, .. } => Some(id.as_str()),
        }
    }
}

/// State shared by the raster and vector widgets.
pub(crate) struct PreviewCore<P: ?Sized> {
    pub(crate) map: Map,
    pub(crate) options: PreviewOptions,
    pub(crate) controls: PreviewControls,
    pub(crate) state: ActiveLayer,
    sequencer: RequestSequencer,
    pub(crate) platform: Arc<P>,
}

impl<P: PlatformService + ?Sized> PreviewCore<P> {
    /// Waits for the map and attaches the navigation control.
    pub(crate) async fn new(
        mut map: Map,
        options: PreviewOptions,
        controls: PreviewControls,
        platform: Arc<P>,
    ) -> Result<Self, PreviewError> {
        map.wait_ready().await?;
        map.add_control(NavigationControl::zoom_only(), ControlPosition::BottomRight);

        Ok(Self {
            map,
            options,
            controls,
            state: ActiveLayer::Uninitialized,
            sequencer: RequestSequencer::default(),
            platform,
        })
    }

    /// Descriptor of the layer chosen in the layer control.
    pub(crate) fn selected_layer(&self) -> Option<&LayerDescriptor> {
        let id = self.controls.layer_select.value()?;
        self.options.find_layer(id)
    }

    pub(crate) fn selected_timestamp(&self) -> Option<String> {
        self.controls.timestamps_select.value().map(str::to_string)
    }

    pub(crate) fn begin_selection(&mut self, layer_id: &str) -> Result<LayerSelection, PreviewError> {
        let descriptor = self
            .options
            .find_layer(layer_id)
            .ok_or_else(|| PreviewError::UnknownLayer(layer_id.to_string()))?;
        descriptor.tile_template()?;

        let request = descriptor
            .tile_json_url
            .as_ref()
            .filter(|url| !url.is_empty())
            .map(|url| TimestampsRequest {
                url: url.clone(),
                response_key: descriptor.timestamps_key().to_string(),
            });

        self.controls.layer_select.select_or_append(layer_id);
        self.controls.timestamps_select.clear();
        self.controls.timestamps_visible = false;

        let token = self.sequencer.issue();
        log::debug!("Selecting layer {layer_id} ({token:?})");

        Ok(LayerSelection {
            token,
            layer_id: layer_id.to_string(),
            request,
        })
    }

    /// Applies loaded timestamps to the controls and returns the descriptor to set.
    ///
    /// Returns `None` if a newer selection was started in the meantime.
    pub(crate) fn accept_selection(
        &mut self,
        resolved: ResolvedSelection,
    ) -> Option<LayerDescriptor> {
        if !self.sequencer.is_current(resolved.token) {
            log::debug!(
                "Discarding stale selection of layer {} ({:?})",
                resolved.layer_id,
                resolved.token
            );
            return None;
        }

        if let Some(timestamps) = resolved.timestamps {
            self.controls.timestamps_select.set_options(timestamps);
            self.controls.timestamps_visible = true;
        }

        self.options.find_layer(&resolved.layer_id).cloned()
    }

    pub(crate) fn remove_layer_and_source(&mut self, id: &str) -> Result<(), PreviewError> {
        if self.map.has_layer(id) {
            self.map.remove_layer(id)?;
        }
        if self.map.has_source(id) {
            self.map.remove_source(id)?;
        }
        Ok(())
    }

    /// Rewrites query parameters of a source's tile template and reloads its tiles.
    pub(crate) fn update_source_tile_url(
        &mut self,
        source_id: &str,
        params: &[(&str, &str)],
    ) -> Result<(), PreviewError> {
        let source = self
            .map
            .get_source(source_id)
            .ok_or_else(|| PreviewError::SourceNotFound(source_id.to_string()))?;
        let template = source
            .tiles
            .first()
            .ok_or_else(|| PreviewError::MissingTileTemplate(source_id.to_string()))?;

        let tile_url = update_tile_url(template, params.iter().copied())?;
        log::info!("Source {source_id} now loads tiles from {tile_url}");

        self.map.set_source_tiles(source_id, vec![tile_url])?;
        self.map.clear_tiles(source_id)?;
        self.map.update_tiles(source_id)?;
        self.map.trigger_repaint();

        Ok(())
    }
}
