//! Style-level model of the preview map.
//!
//! [`Map`] keeps the registry of sources and layers, images, controls, popups and the tiles each
//! source has requested. Drawing is done by an external renderer: it fires the [`ReadySignal`]
//! once the map can be mutated and receives redraw requests through a [`Messenger`].

use ahash::{HashMap, HashSet};
use serde::Serialize;
use tokio::sync::watch;

use crate::decoded_image::DecodedImage;
use crate::error::PreviewError;
use crate::tile_url::{lonlat_to_tile, TileIndex};

mod control;
mod source_cache;
mod style;

pub use control::{ControlPosition, NavigationControl};
pub use source_cache::SourceCache;
pub use style::{Source, SourceKind, Style, StyleLayer};

const MAX_ZOOM: f64 = 22.0;

/// Receives redraw requests from the map.
pub trait Messenger: Send + Sync {
    /// Map state changed and must be drawn again.
    fn request_redraw(&self);
}

/// Geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    /// Creates a new position.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Initial view and decorations of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Id of the element the map is drawn into.
    pub container: String,
    /// Initial view center.
    pub center: LngLat,
    /// Initial zoom level.
    pub zoom: f64,
    /// Show the attribution control.
    pub attribution_control: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            container: "preview-map".to_string(),
            center: LngLat::new(0.0, 0.0),
            zoom: 2.0,
            attribution_control: true,
        }
    }
}

/// HTML popup anchored at a map position.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// Anchor position.
    pub lng_lat: LngLat,
    /// Popup content.
    pub html: String,
}

/// Fired by the renderer once the map has loaded its style and accepts mutations.
#[derive(Debug)]
pub struct ReadySignal(watch::Sender<bool>);

impl ReadySignal {
    /// Marks the map as ready.
    pub fn ready(&self) {
        self.0.send_replace(true);
    }
}

/// The preview map.
pub struct Map {
    options: MapOptions,
    style: Style,
    center: LngLat,
    zoom: f64,
    caches: HashMap<String, SourceCache>,
    images: HashMap<String, DecodedImage>,
    controls: Vec<(NavigationControl, ControlPosition)>,
    popup: Option<Popup>,
    click_listeners: HashSet<String>,
    messenger: Option<Box<dyn Messenger>>,
    ready: watch::Receiver<bool>,
}

impl Map {
    /// Creates a map with the given style. The map is not ready until the returned signal fires.
    pub fn new(options: MapOptions, style: Style) -> (Self, ReadySignal) {
        let (sender, receiver) = watch::channel(false);
        let map = Self {
            center: options.center,
            zoom: options.zoom,
            options,
            style,
            caches: HashMap::default(),
            images: HashMap::default(),
            controls: vec![],
            popup: None,
            click_listeners: HashSet::default(),
            messenger: None,
            ready: receiver,
        };

        (map, ReadySignal(sender))
    }

    /// Waits for the ready signal.
    pub async fn wait_ready(&self) -> Result<(), PreviewError> {
        let mut ready = self.ready.clone();
        ready
            .wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| PreviewError::MapClosed)
    }

    /// Whether the ready signal has fired.
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Sets the messenger notified about redraws.
    pub fn set_messenger(&mut self, messenger: Option<impl Messenger + 'static>) {
        self.messenger = messenger.map(|m| Box::new(m) as Box<dyn Messenger>);
    }

    /// Options the map was created with.
    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Current style document.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Moves the view.
    pub fn set_view(&mut self, center: LngLat, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(0.0, MAX_ZOOM);
    }

    /// Current view center.
    pub fn center(&self) -> LngLat {
        self.center
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Adds a source. Fails if a source with the same id exists.
    pub fn add_source(&mut self, id: impl Into<String>, source: Source) -> Result<(), PreviewError> {
        let id = id.into();
        if self.style.sources.contains_key(&id) {
            return Err(PreviewError::DuplicateSource(id));
        }

        log::debug!("Adding source {id} with tiles {:?}", source.tiles);
        self.style.sources.insert(id, source);
        Ok(())
    }

    /// Removes a source and its tile cache. Fails if a layer still uses it.
    pub fn remove_source(&mut self, id: &str) -> Result<Source, PreviewError> {
        if let Some(layer) = self.style.layers.iter().find(|layer| layer.source == id) {
            return Err(PreviewError::SourceInUse {
                source_id: id.to_string(),
                layer_id: layer.id.clone(),
            });
        }

        let source = self
            .style
            .sources
            .remove(id)
            .ok_or_else(|| PreviewError::SourceNotFound(id.to_string()))?;
        self.caches.remove(id);

        log::debug!("Removed source {id}");
        Ok(source)
    }

    /// Source with the given id.
    pub fn get_source(&self, id: &str) -> Option<&Source> {
        self.style.sources.get(id)
    }

    /// Whether a source with the given id exists.
    pub fn has_source(&self, id: &str) -> bool {
        self.style.sources.contains_key(id)
    }

    /// Adds a layer on top of all others. Its source must exist.
    pub fn add_layer(&mut self, layer: StyleLayer) -> Result<(), PreviewError> {
        if self.has_layer(&layer.id) {
            return Err(PreviewError::DuplicateLayer(layer.id));
        }
        if !self.has_source(&layer.source) {
            return Err(PreviewError::SourceNotFound(layer.source));
        }

        log::debug!("Adding {} layer {}", layer.kind, layer.id);
        self.style.layers.push(layer);
        Ok(())
    }

    /// Removes a layer together with its click listener.
    pub fn remove_layer(&mut self, id: &str) -> Result<StyleLayer, PreviewError> {
        let position = self
            .style
            .layers
            .iter()
            .position(|layer| layer.id == id)
            .ok_or_else(|| PreviewError::LayerNotFound(id.to_string()))?;
        self.click_listeners.remove(id);

        log::debug!("Removed layer {id}");
        Ok(self.style.layers.remove(position))
    }

    /// Layer with the given id.
    pub fn get_layer(&self, id: &str) -> Option<&StyleLayer> {
        self.style.layers.iter().find(|layer| layer.id == id)
    }

    /// Whether a layer with the given id exists.
    pub fn has_layer(&self, id: &str) -> bool {
        self.get_layer(id).is_some()
    }

    /// Replaces the tile templates of a source. Layers drawing the source are kept as they are.
    pub fn set_source_tiles(&mut self, id: &str, tiles: Vec<String>) -> Result<(), PreviewError> {
        let source = self
            .style
            .sources
            .get_mut(id)
            .ok_or_else(|| PreviewError::SourceNotFound(id.to_string()))?;

        log::debug!("Source {id} tiles set to {tiles:?}");
        source.tiles = tiles;
        Ok(())
    }

    /// Tiles covering the current view: the tile under the center and its neighbours.
    pub fn visible_tiles(&self) -> Vec<TileIndex> {
        let z = self.zoom.floor().clamp(0.0, MAX_ZOOM) as u32;
        let center = lonlat_to_tile(self.center.lng, self.center.lat, z);
        let n = 1i32 << z;

        let mut tiles = vec![];
        for dy in -1..=1 {
            let y = center.y + dy;
            if y < 0 || y >= n {
                continue;
            }
            for dx in -1..=1 {
                let index = TileIndex::new((center.x + dx).rem_euclid(n), y, z);
                if !tiles.contains(&index) {
                    tiles.push(index);
                }
            }
        }

        tiles
    }

    /// Requests the visible tiles of every source.
    pub fn load_tiles(&mut self) {
        let visible = self.visible_tiles();
        for (id, source) in &self.style.sources {
            self.caches
                .entry(id.clone())
                .or_default()
                .update(&source.tiles, visible.iter().copied());
        }
    }

    /// Drops the cached tiles of a source.
    pub fn clear_tiles(&mut self, id: &str) -> Result<(), PreviewError> {
        if !self.has_source(id) {
            return Err(PreviewError::SourceNotFound(id.to_string()));
        }

        if let Some(cache) = self.caches.get_mut(id) {
            cache.clear();
        }
        Ok(())
    }

    /// Requests the visible tiles of one source that are not cached and forgets the ones that
    /// left the view.
    pub fn update_tiles(&mut self, id: &str) -> Result<(), PreviewError> {
        let visible = self.visible_tiles();
        let source = self
            .style
            .sources
            .get(id)
            .ok_or_else(|| PreviewError::SourceNotFound(id.to_string()))?;

        let requested = self
            .caches
            .entry(id.to_string())
            .or_default()
            .update(&source.tiles, visible);
        log::trace!("Source {id} requested {requested} tiles");
        Ok(())
    }

    /// Tile cache of a source.
    pub fn source_cache(&self, id: &str) -> Option<&SourceCache> {
        self.caches.get(id)
    }

    /// Asks the renderer to draw the map again.
    pub fn trigger_repaint(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }

    /// Registers an image style layers can reference by name. An existing image is replaced.
    pub fn add_image(&mut self, name: impl Into<String>, image: DecodedImage) {
        let name = name.into();
        log::debug!(
            "Adding image {name} ({}x{})",
            image.width(),
            image.height()
        );
        self.images.insert(name, image);
    }

    /// Whether an image with the given name is registered.
    pub fn has_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// Image with the given name.
    pub fn image(&self, name: &str) -> Option<&DecodedImage> {
        self.images.get(name)
    }

    /// Attaches a control.
    pub fn add_control(&mut self, control: NavigationControl, position: ControlPosition) {
        self.controls.push((control, position));
    }

    /// Attached controls.
    pub fn controls(&self) -> &[(NavigationControl, ControlPosition)] {
        &self.controls
    }

    /// Opens a popup, closing the one already open.
    pub fn add_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
        self.trigger_repaint();
    }

    /// Closes the open popup, if any, and returns it.
    pub fn close_popup(&mut self) -> Option<Popup> {
        let popup = self.popup.take()?;
        self.trigger_repaint();
        Some(popup)
    }

    /// The open popup.
    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Registers a click listener for a layer. Registering the same layer again has no effect.
    pub fn on_click(&mut self, layer_id: &str) -> Result<(), PreviewError> {
        if !self.has_layer(layer_id) {
            return Err(PreviewError::LayerNotFound(layer_id.to_string()));
        }

        self.click_listeners.insert(layer_id.to_string());
        Ok(())
    }

    /// Whether clicks on the layer are listened to.
    pub fn has_click_listener(&self, layer_id: &str) -> bool {
        self.click_listeners.contains(layer_id)
    }
}
