use std::sync::Arc;

use super::{
    load_timestamps, ActiveLayer, LayerSelection, PreviewControls, PreviewCore,
    ResolvedSelection, TIME_PARAM,
};
use crate::config::{LayerDescriptor, PreviewOptions, DEFAULT_TIMESTAMPS_KEY};
use crate::error::PreviewError;
use crate::map::{Map, Source, StyleLayer};
use crate::platform::PlatformService;
use crate::tile_url::update_tile_url;

/// Preview of raster tile layers.
///
/// The selected layer is drawn as a single raster source and layer, both named after the layer
/// id. The selected timestamp is sent as the `time` query parameter.
pub struct RasterPreview<P: PlatformService + ?Sized> {
    core: PreviewCore<P>,
}

impl<P: PlatformService + ?Sized> RasterPreview<P> {
    /// Waits for the map to become ready, attaches the navigation control and shows the layer
    /// preselected in `controls`, if any.
    pub async fn initialize(
        map: Map,
        options: PreviewOptions,
        controls: PreviewControls,
        platform: Arc<P>,
    ) -> Result<Self, PreviewError> {
        let core = PreviewCore::new(map, options, controls, platform).await?;
        let mut preview = Self { core };

        if let Some(layer_id) = preview.core.controls.layer_select.value().map(str::to_string) {
            preview.select_layer(&layer_id).await?;
        }

        Ok(preview)
    }

    /// Loads the timestamps listed by a tile-JSON endpoint.
    ///
    /// `response_key` defaults to `timestamps`.
    pub async fn load_timestamps(
        &self,
        tile_json_url: &str,
        response_key: Option<&str>,
    ) -> Result<Vec<String>, PreviewError> {
        load_timestamps(
            &*self.core.platform,
            tile_json_url,
            response_key.unwrap_or(DEFAULT_TIMESTAMPS_KEY),
        )
        .await
    }

    /// Shows the layer with the given id: loads its timestamps (if it has any) and sets it.
    ///
    /// Returns `false` if a newer selection superseded this one while its timestamps loaded.
    pub async fn select_layer(&mut self, layer_id: &str) -> Result<bool, PreviewError> {
        let selection = self.begin_layer_selection(layer_id)?;
        let platform = self.core.platform.clone();
        let resolved = selection.resolve(&*platform).await?;
        self.complete_layer_selection(resolved)
    }

    /// First half of [`RasterPreview::select_layer`]: records the selection and hides the
    /// timestamp control until the new timestamps arrive.
    pub fn begin_layer_selection(&mut self, layer_id: &str) -> Result<LayerSelection, PreviewError> {
        self.core.begin_selection(layer_id)
    }

    /// Second half of [`RasterPreview::select_layer`]: populates the timestamp control and sets
    /// the layer, unless a newer selection was started.
    pub fn complete_layer_selection(
        &mut self,
        resolved: ResolvedSelection,
    ) -> Result<bool, PreviewError> {
        let Some(descriptor) = self.core.accept_selection(resolved) else {
            return Ok(false);
        };

        self.set_layer(&descriptor)?;
        Ok(true)
    }

    /// Replaces the map layer of `descriptor` with a fresh one showing the selected timestamp.
    ///
    /// Calling it repeatedly with the same descriptor leaves exactly one source and one layer. A
    /// descriptor without a tile template is rejected before the current layer is touched.
    pub fn set_layer(&mut self, descriptor: &LayerDescriptor) -> Result<(), PreviewError> {
        let layer_id = descriptor.id.as_str();

        let mut params = vec![];
        let timestamp = self.core.selected_timestamp();
        if let Some(time) = &timestamp {
            params.push((TIME_PARAM, time.as_str()));
        }
        let tile_url = update_tile_url(descriptor.tile_template()?, params)?;

        if let Some(previous) = self.core.state.layer_id().map(str::to_string) {
            if previous != layer_id {
                self.core.remove_layer_and_source(&previous)?;
            }
        }
        self.core.remove_layer_and_source(layer_id)?;
        self.core.state = ActiveLayer::Uninitialized;

        log::info!("Setting raster layer {layer_id} with tiles {tile_url}");
        self.core
            .map
            .add_source(layer_id, Source::raster(vec![tile_url]))?;
        self.core
            .map
            .add_layer(StyleLayer::raster(layer_id, layer_id))?;
        self.core.map.update_tiles(layer_id)?;
        self.core.map.trigger_repaint();

        self.core.state = ActiveLayer::LayerSet {
            id: layer_id.to_string(),
        };
        Ok(())
    }

    /// Switches the active layer to another timestamp.
    ///
    /// Only the tile template of the layer source changes: the layer itself stays on the map,
    /// its cached tiles are dropped and the visible ones are requested again.
    pub fn on_timestamp_change(&mut self, time: &str) -> Result<(), PreviewError> {
        if time.is_empty() {
            return Ok(());
        }
        self.core.controls.timestamps_select.select(time);

        let Some(layer_id) = self.core.state.layer_id().map(str::to_string) else {
            return Ok(());
        };

        self.core
            .update_source_tile_url(&layer_id, &[(TIME_PARAM, time)])?;
        self.core.state = ActiveLayer::LayerUpdated {
            id: layer_id,
            time: time.to_string(),
        };
        Ok(())
    }

    /// The preview map.
    pub fn map(&self) -> &Map {
        &self.core.map
    }

    /// Mutable access to the preview map, e.g. to move the view or install a messenger.
    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.core.map
    }

    /// Page controls.
    pub fn controls(&self) -> &PreviewControls {
        &self.core.controls
    }

    /// Lifecycle state of the active layer.
    pub fn state(&self) -> &ActiveLayer {
        &self.core.state
    }

    /// Layer descriptors of the previewed dataset.
    pub fn options(&self) -> &PreviewOptions {
        &self.core.options
    }
}
