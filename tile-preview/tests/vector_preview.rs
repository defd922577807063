//! Vector preview: sub-layers, icons, popups and time parameters.

use std::sync::Arc;

use serde_json::{json, Value};
use tile_preview::map::SourceKind;
use tile_preview::popup::Feature;
use tile_preview::preview::{sublayer_id, ClickEvent};
use tile_preview::{ActiveLayer, LngLat, PreviewControls, PreviewError, PreviewOptions, VectorPreview};

mod common;
use common::{options, ready_map, MockPlatform};

const STATIONS_JSON: &str = "https://tiles.test/stations/tiles.json";
const PIN_URL: &str = "https://tiles.test/icons/pin.png";

fn preview_options() -> PreviewOptions {
    options(json!({
        "dataLayers": [
            {
                "id": "stations",
                "layerConfig": {
                    "source": {"type": "vector", "tiles": ["https://tiles.test/stations/{z}/{x}/{y}.pbf"]},
                    "render": {"layers": [
                        {"type": "circle", "source-layer": "default", "paint": {"circle-radius": 4}},
                        {"type": "line", "source-layer": "default", "minzoom": 5},
                        {"type": "symbol", "source-layer": "default", "layout": {"icon-image": "pin"}}
                    ]}
                },
                "tileJsonUrl": STATIONS_JSON,
                "paramsSelectorConfig": [
                    {"key": "time", "type": "datetime", "url_param": "date"}
                ],
                "interactionConfig": {"output": [{"column": "a", "property": "Label A"}]}
            },
            {
                "id": "rivers",
                "layerConfig": {
                    "source": {"type": "vector", "tiles": ["https://tiles.test/rivers/{z}/{x}/{y}.pbf"]},
                    "render": {"layers": [{"type": "line", "source-layer": "rivers"}]}
                },
                "tileJsonUrl": "https://tiles.test/rivers/tiles.json"
            },
            {
                "id": "broken",
                "layerConfig": {
                    "source": {"type": "vector", "tiles": []},
                    "render": {"layers": [{"type": "line", "source-layer": "broken"}]}
                }
            },
            {
                "id": "empty",
                "layerConfig": {"source": {"type": "vector", "tiles": ["https://tiles.test/empty/{z}/{x}/{y}.pbf"]}}
            }
        ],
        "iconImages": [{"name": "pin", "url": PIN_URL}]
    }))
}

fn platform() -> MockPlatform {
    MockPlatform::default()
        .with_response(PIN_URL, vec![255u8; 4])
        .with_json(STATIONS_JSON, json!({"timestamps": ["2021-01-01", "2021-02-01"]}))
        .with_json(
            "https://tiles.test/rivers/tiles.json",
            json!({"timestamps": ["2019-01-01"]}),
        )
}

async fn preview(selected: Option<&str>) -> (VectorPreview<MockPlatform>, Arc<MockPlatform>) {
    let options = preview_options();
    let controls = PreviewControls::for_layers(&options, selected);
    let platform = Arc::new(platform());
    let preview = VectorPreview::initialize(ready_map(), options, controls, platform.clone())
        .await
        .unwrap();
    (preview, platform)
}

fn feature(properties: Value) -> Feature {
    match properties {
        Value::Object(properties) => Feature::new(properties),
        _ => panic!("feature properties must be an object"),
    }
}

#[tokio::test]
async fn every_render_layer_becomes_a_sublayer() {
    let (preview, platform) = preview(Some("stations")).await;

    let ids = ["stations-circle-0", "stations-line-1", "stations-symbol-2"];
    assert_eq!(preview.sublayers(), ids);
    assert_eq!(platform.requests(), vec![PIN_URL.to_string(), STATIONS_JSON.to_string()]);

    for id in ids {
        let source = preview.map().get_source(id).unwrap();
        assert_eq!(source.kind, SourceKind::Vector);
        assert_eq!(
            source.tiles,
            vec!["https://tiles.test/stations/{z}/{x}/{y}.pbf?date=2021-01-01".to_string()]
        );

        let layer = preview.map().get_layer(id).unwrap();
        assert_eq!(layer.source, id);
        assert_eq!(layer.spec["source-layer"], "default");
        assert!(preview.map().has_click_listener(id));
    }

    let line = preview.map().get_layer("stations-line-1").unwrap();
    assert_eq!(line.kind, "line");
    assert_eq!(line.minzoom, Some(5.0));
}

#[tokio::test]
async fn icons_are_registered_before_layers() {
    let (preview, _) = preview(None).await;

    let pin = preview.map().image("pin").unwrap();
    assert_eq!((pin.width(), pin.height()), (1, 1));
    assert!(preview.sublayers().is_empty());
}

#[tokio::test]
async fn icon_failure_is_fatal() {
    let options = preview_options();
    let controls = PreviewControls::for_layers(&options, Some("stations"));
    let platform = Arc::new(
        MockPlatform::default()
            .with_json(STATIONS_JSON, json!({"timestamps": []})),
    );

    let result = VectorPreview::initialize(ready_map(), options, controls, platform.clone()).await;

    assert!(matches!(result, Err(PreviewError::NotFound)));
    assert_eq!(platform.requests(), vec![PIN_URL.to_string()]);
}

#[tokio::test]
async fn undecodable_icon_is_fatal() {
    let options = preview_options();
    let controls = PreviewControls::for_layers(&options, None);
    let platform = Arc::new(MockPlatform::default().with_response(PIN_URL, b"not a png".to_vec()));

    let result = VectorPreview::initialize(ready_map(), options, controls, platform).await;
    assert!(matches!(result, Err(PreviewError::ImageDecode(_))));
}

#[tokio::test]
async fn layer_without_time_param_ignores_timestamp() {
    let (mut preview, _) = preview(Some("rivers")).await;

    assert_eq!(preview.sublayers(), [sublayer_id("rivers", "line", 0)]);
    let tiles = &preview.map().get_source("rivers-line-0").unwrap().tiles;
    assert_eq!(tiles, &vec!["https://tiles.test/rivers/{z}/{x}/{y}.pbf".to_string()]);

    preview.on_timestamp_change("2019-01-01").unwrap();
    let tiles = &preview.map().get_source("rivers-line-0").unwrap().tiles;
    assert_eq!(tiles, &vec!["https://tiles.test/rivers/{z}/{x}/{y}.pbf".to_string()]);
    assert_eq!(
        preview.state(),
        &ActiveLayer::LayerUpdated {
            id: "rivers".to_string(),
            time: "2019-01-01".to_string()
        }
    );
}

#[tokio::test]
async fn timestamp_change_updates_every_sublayer() {
    let (mut preview, _) = preview(Some("stations")).await;
    let layers_before = preview.map().style().layers.clone();

    preview.on_timestamp_change("2021-02-01").unwrap();

    assert_eq!(preview.map().style().layers, layers_before);
    for id in preview.sublayers() {
        let source = preview.map().get_source(id).unwrap();
        assert_eq!(
            source.tiles,
            vec!["https://tiles.test/stations/{z}/{x}/{y}.pbf?date=2021-02-01".to_string()]
        );
        let cache = preview.map().source_cache(id).unwrap();
        assert!(cache.urls().all(|url| url.ends_with("date=2021-02-01")));
    }
}

#[tokio::test]
async fn switching_layers_removes_previous_sublayers() {
    let (mut preview, _) = preview(Some("stations")).await;
    preview.select_layer("rivers").await.unwrap();

    for id in ["stations-circle-0", "stations-line-1", "stations-symbol-2"] {
        assert!(!preview.map().has_layer(id));
        assert!(!preview.map().has_source(id));
        assert!(!preview.map().has_click_listener(id));
    }
    assert!(preview.map().has_layer("rivers-line-0"));
}

#[tokio::test]
async fn reselecting_a_layer_leaves_one_copy() {
    let (mut preview, _) = preview(Some("stations")).await;
    preview.select_layer("stations").await.unwrap();

    let style = preview.map().style();
    assert_eq!(
        style
            .layers
            .iter()
            .filter(|layer| layer.id.starts_with("stations-"))
            .count(),
        3
    );
}

#[tokio::test]
async fn layer_without_render_layers_adds_nothing() {
    let (mut preview, _) = preview(Some("stations")).await;
    preview.select_layer("empty").await.unwrap();

    assert!(preview.sublayers().is_empty());
    assert_eq!(preview.map().style().layers.len(), 1);
    assert_eq!(
        preview.state(),
        &ActiveLayer::LayerSet {
            id: "empty".to_string()
        }
    );
}

#[tokio::test]
async fn click_opens_popup_with_allowed_fields() {
    let (mut preview, _) = preview(Some("stations")).await;
    let event = ClickEvent {
        lng_lat: LngLat::new(36.8, -1.3),
        features: vec![feature(json!({"a": 1, "b": 2, "c": 3}))],
    };

    let popup = preview.click("stations-circle-0", &event).unwrap();

    assert_eq!(popup.lng_lat, LngLat::new(36.8, -1.3));
    insta::assert_snapshot!(popup.html.as_str(), @"<div class='station-popup-content'><p><b>Label A:</b> 1<br/></p></div>");
    assert_eq!(preview.map().popup(), Some(&popup));
}

#[tokio::test]
async fn click_without_popup_fields_opens_nothing() {
    let (mut preview, _) = preview(Some("rivers")).await;
    let event = ClickEvent {
        lng_lat: LngLat::default(),
        features: vec![feature(json!({"a": 1}))],
    };

    assert_eq!(preview.click("rivers-line-0", &event), None);
    assert_eq!(preview.map().popup(), None);
}

#[tokio::test]
async fn click_on_foreign_layer_or_empty_spot_opens_nothing() {
    let (mut preview, _) = preview(Some("stations")).await;
    let event = ClickEvent {
        lng_lat: LngLat::default(),
        features: vec![feature(json!({"a": 1}))],
    };
    assert_eq!(preview.click("carto-light-layer", &event), None);

    let empty = ClickEvent::default();
    assert_eq!(preview.click("stations-circle-0", &empty), None);

    let unrelated = ClickEvent {
        lng_lat: LngLat::default(),
        features: vec![feature(json!({"z": 1}))],
    };
    assert_eq!(preview.click("stations-circle-0", &unrelated), None);
    assert_eq!(preview.map().popup(), None);
}

#[tokio::test]
async fn next_click_replaces_or_closes_popup() {
    let (mut preview, _) = preview(Some("stations")).await;
    let click_at = |lng: f64, value: i64| ClickEvent {
        lng_lat: LngLat::new(lng, 0.0),
        features: vec![feature(json!({ "a": value }))],
    };

    preview.click("stations-circle-0", &click_at(1.0, 1)).unwrap();
    let second = preview.click("stations-line-1", &click_at(2.0, 2)).unwrap();
    assert_eq!(preview.map().popup(), Some(&second));

    assert_eq!(preview.click("stations-circle-0", &ClickEvent::default()), None);
    assert_eq!(preview.map().popup(), None);
}

#[tokio::test]
async fn layer_without_tile_template_keeps_current_sublayers() {
    let (mut preview, platform) = preview(Some("stations")).await;
    let sublayers = preview.sublayers().to_vec();

    let result = preview.select_layer("broken").await;
    assert!(matches!(result, Err(PreviewError::MissingTileTemplate(id)) if id == "broken"));

    assert_eq!(platform.requests(), vec![PIN_URL.to_string(), STATIONS_JSON.to_string()]);
    assert_eq!(preview.sublayers(), sublayers);
    assert_eq!(preview.controls().layer_select.value(), Some("stations"));
    assert_eq!(preview.state().layer_id(), Some("stations"));

    let broken = preview.options().find_layer("broken").unwrap().clone();
    assert!(preview.set_layer(&broken).is_err());
    assert_eq!(preview.sublayers(), sublayers);

    preview.on_timestamp_change("2021-02-01").unwrap();
    for id in &sublayers {
        assert!(preview.map().get_source(id).unwrap().tiles[0].ends_with("date=2021-02-01"));
    }
}
