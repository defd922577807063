//! Map preview widgets for time-parameterised raster and vector tile layers.
//!
//! A preview is created from the layer descriptors the hosting page injects ([`PreviewOptions`])
//! and a [`Map`]. Once the map signals it is ready, the widget shows the preselected layer,
//! loads its available timestamps and re-points the tile source whenever another timestamp is
//! chosen.
//!
//! ```ignore
//! let options = PreviewOptions::from_json(&json)?;
//! let controls = PreviewControls::for_layers(&options, Some("rainfall"));
//! let (map, ready) = Map::new(MapOptions::default(), Style::default_basemap());
//! ready.ready();
//!
//! let platform = Arc::new(NativePlatformService::new());
//! let mut preview = RasterPreview::initialize(map, options, controls, platform).await?;
//! preview.on_timestamp_change("2024-01-01T00:00:00Z")?;
//! ```
//!
//! Network access and image decoding go through the [`PlatformService`] trait.

pub mod config;
mod decoded_image;
pub mod error;
pub mod map;
pub mod platform;
pub mod popup;
pub mod preview;
pub mod tile_url;

pub use config::{LayerDescriptor, PreviewOptions};
pub use decoded_image::DecodedImage;
pub use error::PreviewError;
pub use map::{LngLat, Map, MapOptions, Messenger, ReadySignal, Style};
#[cfg(not(target_arch = "wasm32"))]
pub use platform::NativePlatformService;
pub use platform::PlatformService;
pub use preview::{ActiveLayer, PreviewControls, RasterPreview, SelectControl, VectorPreview};
pub use tile_url::{update_tile_url, TileIndex};
