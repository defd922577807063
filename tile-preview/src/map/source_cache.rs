//! Per-source cache of requested tiles.

use std::collections::BTreeMap;

use crate::tile_url::{expand_template, TileIndex};

/// Tiles a source has requested, with the URL each was requested from.
///
/// Only tiles of the last update are kept. Clearing the cache forces the next update to resolve every visible tile again, which is what
/// makes a changed tile template visible without re-creating the layer.
#[derive(Debug, Clone, Default)]
pub struct SourceCache {
    tiles: BTreeMap<TileIndex, String>,
}

impl SourceCache {
    /// Resolves the given tiles that are not cached yet and drops cached tiles not among them.
    ///
    /// Returns the number of newly requested tiles.
    pub fn update(
        &mut self,
        templates: &[String],
        indices: impl IntoIterator<Item = TileIndex>,
    ) -> usize {
        let indices: Vec<TileIndex> = indices.into_iter().collect();
        self.tiles.retain(|index, _| indices.contains(index));
        if templates.is_empty() {
            return 0;
        }

        let mut requested = 0;
        for index in indices {
            if self.tiles.contains_key(&index) {
                continue;
            }

            let template = &templates[(index.x + index.y).unsigned_abs() as usize % templates.len()];
            let url = expand_template(template, index);
            log::trace!("Requesting tile {index:?} from {url}");
            self.tiles.insert(index, url);
            requested += 1;
        }

        requested
    }

    /// Drops all cached tiles.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// URL the tile was requested from.
    pub fn get(&self, index: TileIndex) -> Option<&str> {
        self.tiles.get(&index).map(String::as_str)
    }

    /// Requested URLs in tile index order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.tiles.values().map(String::as_str)
    }

    /// Number of cached tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the cache holds no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_only_requests_missing_tiles() {
        let templates = vec!["https://x/{z}/{x}/{y}.png?time=a".to_string()];
        let mut cache = SourceCache::default();

        let first = [TileIndex::new(0, 0, 1), TileIndex::new(1, 0, 1)];
        assert_eq!(cache.update(&templates, first), 2);
        assert_eq!(cache.update(&templates, [TileIndex::new(1, 0, 1), TileIndex::new(1, 1, 1)]), 1);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(TileIndex::new(0, 0, 1)), None);
        assert_eq!(
            cache.get(TileIndex::new(1, 1, 1)),
            Some("https://x/1/1/1.png?time=a")
        );
    }

    #[test]
    fn clear_then_update_uses_new_template() {
        let mut cache = SourceCache::default();
        let index = TileIndex::new(0, 0, 0);
        cache.update(&["https://x/{z}/{x}/{y}.png?time=a".to_string()], [index]);

        cache.clear();
        assert!(cache.is_empty());

        cache.update(&["https://x/{z}/{x}/{y}.png?time=b".to_string()], [index]);
        assert_eq!(cache.get(index), Some("https://x/0/0/0.png?time=b"));
    }

    #[test]
    fn spreads_tiles_over_templates() {
        let templates = vec![
            "https://a/{z}/{x}/{y}".to_string(),
            "https://b/{z}/{x}/{y}".to_string(),
        ];
        let mut cache = SourceCache::default();
        cache.update(&templates, [TileIndex::new(0, 0, 1), TileIndex::new(1, 0, 1)]);

        assert_eq!(cache.get(TileIndex::new(0, 0, 1)), Some("https://a/1/0/0"));
        assert_eq!(cache.get(TileIndex::new(1, 0, 1)), Some("https://b/1/1/0"));
    }
}
