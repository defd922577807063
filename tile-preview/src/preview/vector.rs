use std::sync::Arc;

use futures::future::try_join_all;

use super::{
    load_timestamps, ActiveLayer, LayerSelection, PreviewControls, PreviewCore,
    ResolvedSelection,
};
use crate::config::{LayerDescriptor, PreviewOptions, DEFAULT_TIMESTAMPS_KEY};
use crate::error::PreviewError;
use crate::map::{LngLat, Map, Popup, Source, StyleLayer};
use crate::platform::PlatformService;
use crate::popup::{feature_html, Feature};
use crate::tile_url::update_tile_url;

/// Map id of the `index`-th render sub-layer of a layer.
pub fn sublayer_id(layer_id: &str, kind: &str, index: usize) -> String {
    format!("{layer_id}-{kind}-{index}")
}

/// Click on a map layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickEvent {
    /// Clicked position.
    pub lng_lat: LngLat,
    /// Features under the cursor, topmost first.
    pub features: Vec<Feature>,
}

/// Preview of vector tile layers.
///
/// Every render sub-layer of the selected layer gets its own source and map layer, so point and
/// line representations of one dataset can be styled independently. Clicking a sub-layer opens a
/// popup with the feature properties allowed by the layer's interaction configuration.
pub struct VectorPreview<P: PlatformService + ?Sized> {
    core: PreviewCore<P>,
    sublayers: Vec<String>,
}

impl<P: PlatformService + ?Sized> VectorPreview<P> {
    /// Waits for the map to become ready, attaches the navigation control, registers all icon
    /// images and shows the layer preselected in `controls`, if any.
    ///
    /// A failing icon load aborts initialization.
    pub async fn initialize(
        map: Map,
        options: PreviewOptions,
        controls: PreviewControls,
        platform: Arc<P>,
    ) -> Result<Self, PreviewError> {
        let core = PreviewCore::new(map, options, controls, platform).await?;
        let mut preview = Self {
            core,
            sublayers: vec![],
        };

        preview.load_icons().await?;

        if let Some(layer_id) = preview.core.controls.layer_select.value().map(str::to_string) {
            preview.select_layer(&layer_id).await?;
        }

        Ok(preview)
    }

    async fn load_icons(&mut self) -> Result<(), PreviewError> {
        let platform = self.core.platform.clone();
        let loads = self.core.options.icon_images.iter().map(|icon| {
            let platform = platform.clone();
            async move {
                log::debug!("Loading icon {} from {}", icon.name, icon.url);
                let image = platform.load_image(&icon.url).await.inspect_err(|err| {
                    log::error!("Failed to load icon {} from {}: {err}", icon.name, icon.url)
                })?;
                Ok::<_, PreviewError>((icon.name.clone(), image))
            }
        });

        let icons = try_join_all(loads).await?;
        for (name, image) in icons {
            self.core.map.add_image(name, image);
        }

        Ok(())
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

    /// Records the selection and hides the timestamp control until the new timestamps arrive.
    pub fn begin_layer_selection(&mut self, layer_id: &str) -> Result<LayerSelection, PreviewError> {
        self.core.begin_selection(layer_id)
    }

    /// Populates the timestamp control and sets the layer, unless a newer selection was started.
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

    /// Replaces the sub-layers of `descriptor` with fresh ones showing the selected timestamp.
    ///
    /// A descriptor without render layers adds nothing to the map. A descriptor without a tile
    /// template is rejected before the current sub-layers are touched.
    pub fn set_layer(&mut self, descriptor: &LayerDescriptor) -> Result<(), PreviewError> {
        let render_layers = descriptor.render_layers();
        let tile_url = if render_layers.is_empty() {
            None
        } else {
            let mut params = vec![];
            let timestamp = self.core.selected_timestamp();
            if let (Some(url_param), Some(time)) = (descriptor.time_url_param(), &timestamp) {
                params.push((url_param, time.as_str()));
            }
            Some(update_tile_url(descriptor.tile_template()?, params)?)
        };

        for previous in std::mem::take(&mut self.sublayers) {
            self.core.remove_layer_and_source(&previous)?;
        }
        self.core.state = ActiveLayer::Uninitialized;

        let Some(tile_url) = tile_url else {
            log::warn!("Layer {} has no render layers", descriptor.id);
            self.core.state = ActiveLayer::LayerSet {
                id: descriptor.id.clone(),
            };
            return Ok(());
        };

        for (index, render_layer) in render_layers.iter().enumerate() {
            let layer_id = sublayer_id(&descriptor.id, &render_layer.kind, index);
            self.core.remove_layer_and_source(&layer_id)?;

            log::info!("Setting vector layer {layer_id} with tiles {tile_url}");
            self.core
                .map
                .add_source(layer_id.as_str(), Source::vector(vec![tile_url.clone()]))?;
            self.core.map.add_layer(
                StyleLayer::new(layer_id.as_str(), render_layer.kind.as_str(), layer_id.as_str())
                    .with_spec(&render_layer.spec),
            )?;
            self.core.map.on_click(&layer_id)?;
            self.core.map.update_tiles(&layer_id)?;

            self.sublayers.push(layer_id);
        }

        self.core.map.trigger_repaint();
        self.core.state = ActiveLayer::LayerSet {
            id: descriptor.id.clone(),
        };
        Ok(())
    }

    /// Switches the sub-layers of the active layer to another timestamp.
    ///
    /// The time is sent under the parameter name declared by the layer's `datetime` selector.
    /// Layers without one keep their tiles.
    pub fn on_timestamp_change(&mut self, time: &str) -> Result<(), PreviewError> {
        if time.is_empty() {
            return Ok(());
        }
        self.core.controls.timestamps_select.select(time);

        let Some(layer_id) = self.core.state.layer_id().map(str::to_string) else {
            return Ok(());
        };
        let url_param = self
            .core
            .options
            .find_layer(&layer_id)
            .and_then(LayerDescriptor::time_url_param)
            .map(str::to_string);

        match url_param {
            Some(url_param) => {
                for sublayer in self.sublayers.clone() {
                    self.core
                        .update_source_tile_url(&sublayer, &[(url_param.as_str(), time)])?;
                }
            }
            None => log::debug!("Layer {layer_id} has no time parameter, tiles are unchanged"),
        }

        self.core.state = ActiveLayer::LayerUpdated {
            id: layer_id,
            time: time.to_string(),
        };
        Ok(())
    }

    /// Handles a click on a map layer and opens a popup for the topmost feature.
    ///
    /// Any click closes the popup already open. Returns the newly opened popup. Clicks on layers
    /// this widget did not add open nothing, and no popup opens unless the feature has at least
    /// one of the layer's popup fields.
    pub fn click(&mut self, layer_id: &str, event: &ClickEvent) -> Option<Popup> {
        self.core.map.close_popup();
        if !self.core.map.has_click_listener(layer_id) {
            return None;
        }

        let feature = event.features.first()?;
        let fields = self.core.selected_layer()?.popup_fields()?;
        let html = feature_html(&feature.properties, &fields)?;

        let popup = Popup {
            lng_lat: event.lng_lat,
            html,
        };
        self.core.map.add_popup(popup.clone());
        Some(popup)
    }

    /// Map ids of the active layer's sub-layers.
    pub fn sublayers(&self) -> &[String] {
        &self.sublayers
    }

    /// The preview map.
    pub fn map(&self) -> &Map {
        &self.core.map
    }

    /// Mutable access to the preview map.
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

    /// Layer descriptors and icons of the previewed dataset.
    pub fn options(&self) -> &PreviewOptions {
        &self.core.options
    }
}
