//! Tile URL templates and query parameter rewriting.
//!
//! Tile sources are addressed by URL templates such as
//! `https://tiles.example.com/{z}/{x}/{y}.png?time=2020-01-01`. The preview widgets never
//! build these URLs from scratch: they take the template provided by the layer descriptor and
//! override individual query parameters (most often the time parameter) with [`update_tile_url`].

use std::f64::consts::PI;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

use crate::error::PreviewError;

/// Index of a tile in the XYZ tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex {
    /// Column.
    pub x: i32,
    /// Row, counted from the top.
    pub y: i32,
    /// Zoom level.
    pub z: u32,
}

impl TileIndex {
    /// Creates a new index.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Sets query parameters of `tile_url` and returns the result in decoded form.
///
/// Every key of `overrides` replaces the value of the first parameter with the same name (and
/// removes any later duplicates) or is appended to the query if the parameter is not present.
/// All other parameters are left untouched and keep their order.
///
/// The returned string is percent-decoded, so `{z}/{x}/{y}` placeholders and reserved characters
/// in parameter values stay human-readable. Escaped `&`, `=`, `#`, `+` and `%` stay escaped, as
/// decoding them would change how the query splits into parameters. Applying the same overrides
/// to the result again produces the same string.
///
/// ```ignore
/// let url = update_tile_url(
///     "https://x/tiles/{z}/{x}/{y}.png?foo=bar",
///     [("time", "2020-01-01T00:00:00.000Z")],
/// )?;
/// assert_eq!(url, "https://x/tiles/{z}/{x}/{y}.png?foo=bar&time=2020-01-01T00:00:00.000Z");
/// ```
pub fn update_tile_url<K, V>(
    tile_url: &str,
    overrides: impl IntoIterator<Item = (K, V)>,
) -> Result<String, PreviewError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(tile_url)?;
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    for (key, value) in overrides {
        set_param(&mut pairs, key.as_ref(), value.as_ref());
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&pairs)
            .finish();
        url.set_query(Some(&query));
    }

    Ok(decode_outside_delimiters(url.as_str()))
}

/// Replaces `{z}`, `{x}` and `{y}` placeholders of the template with the given tile index.
pub fn expand_template(template: &str, index: TileIndex) -> String {
    template
        .replace("{z}", &index.z.to_string())
        .replace("{x}", &index.x.to_string())
        .replace("{y}", &index.y.to_string())
}

/// Returns the web-mercator tile containing the given point at zoom level `z`.
pub fn lonlat_to_tile(lon: f64, lat: f64, z: u32) -> TileIndex {
    let n = 2f64.powi(z as i32);
    let lat = lat.clamp(-85.051_128_78, 85.051_128_78);
    let lat_rad = lat.to_radians();

    let x = ((lon + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    let max = n as i32 - 1;
    TileIndex::new((x as i32).clamp(0, max), (y as i32).clamp(0, max), z)
}

/// Escapes of characters with a meaning in the query string.
const QUERY_DELIMITER_ESCAPES: [&str; 5] = ["%26", "%3D", "%23", "%2B", "%25"];

fn decode_outside_delimiters(url: &str) -> String {
    let mut decoded = String::with_capacity(url.len());
    let mut chunk_start = 0;

    for (pos, _) in url.match_indices('%') {
        let Some(escape) = url.get(pos..pos + 3) else {
            continue;
        };
        if !QUERY_DELIMITER_ESCAPES
            .iter()
            .any(|delimiter| delimiter.eq_ignore_ascii_case(escape))
        {
            continue;
        }

        decoded.push_str(&percent_decode_str(&url[chunk_start..pos]).decode_utf8_lossy());
        decoded.push_str(&escape.to_ascii_uppercase());
        chunk_start = pos + 3;
    }

    decoded.push_str(&percent_decode_str(&url[chunk_start..]).decode_utf8_lossy());
    decoded
}

fn set_param(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter().position(|(k, _)| k == key) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut index = 0;
            pairs.retain(|(k, _)| {
                let keep = index <= first || k != key;
                index += 1;
                keep
            });
        }
        None => pairs.push((key.to_string(), value.to_string())),
    }
}
