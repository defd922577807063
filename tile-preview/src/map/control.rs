//! Map controls.

use serde::Serialize;

/// Corner of the map a control is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    /// Top left corner.
    TopLeft,
    /// Top right corner.
    TopRight,
    /// Bottom left corner.
    BottomLeft,
    /// Bottom right corner.
    BottomRight,
}

/// Zoom buttons and compass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationControl {
    /// Show the compass button.
    pub show_compass: bool,
    /// Show zoom in/out buttons.
    pub show_zoom: bool,
}

impl Default for NavigationControl {
    fn default() -> Self {
        Self {
            show_compass: true,
            show_zoom: true,
        }
    }
}

impl NavigationControl {
    /// Zoom buttons only.
    pub fn zoom_only() -> Self {
        Self {
            show_compass: false,
            show_zoom: true,
        }
    }
}
