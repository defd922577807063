//! Togglers of the admin forms.
//!
//! Element ids follow the form renderer: checkboxes are `id_<field>`, panels are
//! `panel-<field>-section`.

use crate::selector::Selector;
use crate::toggler::Toggler;

/// Admin forms with conditional panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Dataset form.
    Dataset,
    /// MBTiles source form.
    MbtSource,
    /// Raster file form.
    RasterFile,
    /// Raster style form.
    RasterStyle,
    /// Raster tile layer form.
    RasterTileLayer,
    /// Vector tile layer form.
    VectorTileLayer,
}

impl FormKind {
    /// All forms.
    pub const ALL: [FormKind; 6] = [
        FormKind::Dataset,
        FormKind::MbtSource,
        FormKind::RasterFile,
        FormKind::RasterStyle,
        FormKind::RasterTileLayer,
        FormKind::VectorTileLayer,
    ];
}

fn panel(field: &str) -> Selector {
    Selector::id(format!("panel-{field}-section"))
}

/// Togglers used on the given form.
pub fn togglers(kind: FormKind) -> Vec<Toggler> {
    match kind {
        FormKind::Dataset => vec![
            Toggler::new("multi layer", Selector::id("id_multi_layer"))
                .show_when_checked(panel("enable_all_multi_layers_on_add")),
        ],
        FormKind::MbtSource => vec![
            Toggler::new("default style", Selector::name("use_default_style"))
                .hide_when_checked(panel("open_map_style_json")),
        ],
        FormKind::RasterFile => vec![
            Toggler::new("auto ingest", Selector::id("id_auto_ingest_from_directory"))
                .show_when_checked(panel("auto_ingest_settings")),
            Toggler::new(
                "custom directory name",
                Selector::id("id_auto_ingest_use_custom_directory_name"),
            )
            .show_when_checked(Selector::class("show-if-custom-dir-name")),
            Toggler::new("custom legend", Selector::id("id_use_custom_legend"))
                .show_when_checked(panel("legend")),
        ],
        FormKind::RasterStyle => vec![
            Toggler::new("custom colors", Selector::name("use_custom_colors"))
                .hide_when_checked(panel("palette"))
                .show_when_checked(panel("custom_color_values"))
                .hide_when_checked(panel("steps")),
        ],
        FormKind::RasterTileLayer => vec![
            Toggler::new("time from tile json", Selector::id("id_get_time_from_tile_json"))
                .show_when_checked(Selector::class("show_if_get_time_checked")),
        ],
        FormKind::VectorTileLayer => vec![
            Toggler::new("render layers json", Selector::id("id_use_render_layers_json"))
                .show_when_checked(panel("render_layers_json"))
                .hide_when_checked(panel("render_layers")),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_togglers_in_total() {
        let count: usize = FormKind::ALL.iter().map(|kind| togglers(*kind).len()).sum();
        assert_eq!(count, 8);
    }

    #[test]
    fn panel_ids() {
        assert_eq!(
            panel("legend"),
            Selector::id("panel-legend-section")
        );
    }
}
