use serde::{Deserialize, Deserializer, Serialize};
use svg_compose::{
    Align, CanvasSettings, Composition, Outline, Shadow, SvgError, TextCase, TextLayer,
};

use utoipa::ToSchema;

use super::VersionHistory;

/// Complete editing state: version history with its selection, both text
/// layers and the canvas settings.
///
/// Compositions are always computed from one consistent value of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoSession {
    pub history: VersionHistory,
    pub logo_text: TextLayer,
    pub slogan_text: TextLayer,
    pub canvas: CanvasSettings,
}

impl Default for LogoSession {
    fn default() -> Self {
        Self {
            history: VersionHistory::new(),
            logo_text: TextLayer::logo_default(),
            slogan_text: TextLayer::slogan_default(),
            canvas: CanvasSettings::default(),
        }
    }
}

impl LogoSession {
    /// Compose the selected symbol with the current layers and canvas.
    /// Returns `Ok(None)` when nothing is selected.
    pub fn compose(&self) -> Result<Option<Composition>, SvgError> {
        let Some(version) = self.history.current() else {
            return Ok(None);
        };
        svg_compose::compose(
            &version.svg,
            &self.logo_text,
            &self.slogan_text,
            &self.canvas,
        )
        .map(Some)
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Partial update for a text layer. Absent fields are left unchanged;
/// `outline`/`shadow` set to `null` remove the effect.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextLayerPatch {
    pub text: Option<String>,
    pub font: Option<String>,
    pub size: Option<f64>,
    pub weight: Option<u16>,
    pub color: Option<String>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    #[schema(value_type = Option<Object>)]
    pub align: Option<Align>,
    #[schema(value_type = Option<Object>)]
    pub case: Option<TextCase>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Object>)]
    pub outline: Option<Option<Outline>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Object>)]
    pub shadow: Option<Option<Shadow>>,
}

impl TextLayerPatch {
    pub fn apply(self, layer: &mut TextLayer) {
        if let Some(text) = self.text {
            layer.text = text;
        }
        if let Some(font) = self.font {
            layer.font = font;
        }
        if let Some(size) = self.size {
            layer.size = size;
        }
        if let Some(weight) = self.weight {
            layer.weight = weight;
        }
        if let Some(color) = self.color {
            layer.color = color;
        }
        if let Some(spacing) = self.letter_spacing {
            layer.letter_spacing = spacing;
        }
        if let Some(line_height) = self.line_height {
            layer.line_height = line_height;
        }
        if let Some(align) = self.align {
            layer.align = align;
        }
        if let Some(case) = self.case {
            layer.case = case;
        }
        if let Some(outline) = self.outline {
            layer.outline = outline;
        }
        if let Some(shadow) = self.shadow {
            layer.shadow = shadow;
        }
    }
}

/// Partial update for the canvas settings. Zoom is clamped on the way in.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanvasPatch {
    pub zoom: Option<f64>,
    pub show_grid: Option<bool>,
    pub transparent_background: Option<bool>,
    pub background_color: Option<String>,
}

impl CanvasPatch {
    pub fn apply(self, canvas: &mut CanvasSettings) {
        if let Some(zoom) = self.zoom {
            canvas.zoom = zoom;
            canvas.zoom = canvas.clamped_zoom();
        }
        if let Some(show_grid) = self.show_grid {
            canvas.show_grid = show_grid;
        }
        if let Some(transparent) = self.transparent_background {
            canvas.transparent_background = transparent;
        }
        if let Some(color) = self.background_color {
            canvas.background_color = color;
        }
    }
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYMBOL: &str = r#"<svg viewBox="0 0 10 10"><rect width="5" height="5"/></svg>"#;

    #[test]
    fn test_default_session() {
        let session = LogoSession::default();
        assert_eq!(session.logo_text.size, 96.0);
        assert_eq!(session.logo_text.weight, 700);
        assert_eq!(session.slogan_text.size, 36.0);
        assert_eq!(session.slogan_text.color, "#4b5563");
        assert!(session.canvas.show_grid);
        assert!(session.canvas.transparent_background);
    }

    #[test]
    fn test_compose_without_selection() {
        assert_eq!(LogoSession::default().compose().unwrap(), None);
    }

    #[test]
    fn test_compose_selected_version() {
        let mut session = LogoSession::default();
        session.history.add(SYMBOL.to_string(), "square".to_string());
        session.logo_text.text = "Acme".to_string();
        let doc = session.compose().unwrap().unwrap();
        assert!(doc.svg.contains("Acme"));
        assert!(doc.height > 1184.0);
    }

    #[test]
    fn test_text_patch_partial() {
        let mut layer = TextLayer::logo_default();
        let patch: TextLayerPatch =
            serde_json::from_str(r#"{"text":"Acme","align":"left"}"#).unwrap();
        patch.apply(&mut layer);
        assert_eq!(layer.text, "Acme");
        assert_eq!(layer.align, Align::Left);
        assert_eq!(layer.size, 96.0);
    }

    #[test]
    fn test_text_patch_effects_null_vs_absent() {
        let mut layer = TextLayer::logo_default();
        let set: TextLayerPatch =
            serde_json::from_str(r##"{"outline":{"width":2,"color":"#fff"}}"##).unwrap();
        set.apply(&mut layer);
        assert!(layer.outline.is_some());

        let untouched: TextLayerPatch = serde_json::from_str(r#"{"text":"x"}"#).unwrap();
        untouched.apply(&mut layer);
        assert!(layer.outline.is_some());

        let cleared: TextLayerPatch = serde_json::from_str(r#"{"outline":null}"#).unwrap();
        cleared.apply(&mut layer);
        assert!(layer.outline.is_none());
    }

    #[test]
    fn test_canvas_patch_clamps_zoom() {
        let mut canvas = CanvasSettings::default();
        CanvasPatch {
            zoom: Some(12.0),
            show_grid: Some(false),
            ..Default::default()
        }
        .apply(&mut canvas);
        assert_eq!(canvas.zoom, 4.0);
        assert!(!canvas.show_grid);
    }

    #[test]
    fn test_reset() {
        let mut session = LogoSession::default();
        session.history.add(SYMBOL.to_string(), "square".to_string());
        session.logo_text.text = "Acme".to_string();
        session.reset();
        assert_eq!(session, LogoSession::default());
    }
}
