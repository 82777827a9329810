use serde::{Deserialize, Serialize};

use crate::text::clamp;

pub const ZOOM_MIN: f64 = 0.25;
pub const ZOOM_MAX: f64 = 4.0;

/// Presentation and export frame configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    pub zoom: f64,
    pub show_grid: bool,
    pub transparent_background: bool,
    pub background_color: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            show_grid: true,
            transparent_background: true,
            background_color: "#ffffff".to_string(),
        }
    }
}

impl CanvasSettings {
    /// Background fill, or `None` when the canvas is transparent.
    pub fn background_fill(&self) -> Option<&str> {
        if self.transparent_background {
            None
        } else {
            Some(&self.background_color)
        }
    }

    /// Zoom as the preview applies it.
    pub fn clamped_zoom(&self) -> f64 {
        clamp(self.zoom, ZOOM_MIN, ZOOM_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_wins_over_color() {
        let canvas = CanvasSettings {
            background_color: "#ff0000".to_string(),
            ..CanvasSettings::default()
        };
        assert_eq!(canvas.background_fill(), None);

        let opaque = CanvasSettings {
            transparent_background: false,
            ..canvas
        };
        assert_eq!(opaque.background_fill(), Some("#ff0000"));
    }

    #[test]
    fn test_clamped_zoom() {
        let mut canvas = CanvasSettings::default();
        canvas.zoom = 0.0;
        assert_eq!(canvas.clamped_zoom(), 0.25);
        canvas.zoom = 10.0;
        assert_eq!(canvas.clamped_zoom(), 4.0);
    }
}
