//! Previews a layer of a dataset and prints the resulting map style.
//!
//! Run with: cargo run --example preview -- <options.json> <layer id> [timestamp]

use std::sync::Arc;

use anyhow::Context;
use tile_preview::map::Style;
use tile_preview::{
    Map, MapOptions, NativePlatformService, PreviewControls, PreviewOptions, RasterPreview,
    VectorPreview,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: preview <options.json> <layer id> [timestamp]")?;
    let layer_id = args.next().context("layer id is required")?;
    let timestamp = args.next();

    let json = std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let options = PreviewOptions::from_json(&json)?;
    let is_vector = options
        .find_layer(&layer_id)
        .with_context(|| format!("no layer {layer_id} in {path}"))?
        .layer_config
        .render
        .is_some();

    let controls = PreviewControls::for_layers(&options, Some(layer_id.as_str()));
    let (map, ready) = Map::new(MapOptions::default(), Style::default_basemap());
    ready.ready();

    let platform = Arc::new(NativePlatformService::new());

    let style = if is_vector {
        let mut preview = VectorPreview::initialize(map, options, controls, platform).await?;
        if let Some(time) = &timestamp {
            preview.on_timestamp_change(time)?;
        }
        log::info!("Vector sub-layers: {:?}", preview.sublayers());
        serde_json::to_string_pretty(preview.map().style())?
    } else {
        let mut preview = RasterPreview::initialize(map, options, controls, platform).await?;
        if let Some(time) = &timestamp {
            preview.on_timestamp_change(time)?;
        }
        log::info!(
            "Available timestamps: {:?}",
            preview.controls().timestamps_select.options()
        );
        serde_json::to_string_pretty(preview.map().style())?
    };

    println!("{style}");
    Ok(())
}
