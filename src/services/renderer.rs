use crate::error::RenderError;
use crate::rendering::SvgRenderer;
use std::sync::Arc;
use svg_compose::Composition;

/// Raster export of composed documents
pub struct RenderService {
    /// The SVG renderer (shared with the blocking render tasks)
    pub svg_renderer: Arc<SvgRenderer>,
}

impl RenderService {
    pub fn new() -> Self {
        Self {
            svg_renderer: Arc::new(SvgRenderer::new()),
        }
    }

    pub fn with_renderer(svg_renderer: Arc<SvgRenderer>) -> Self {
        Self { svg_renderer }
    }

    /// Rasterize a composition to PNG at `scale`
    ///
    /// Uses spawn_blocking to avoid blocking the async runtime during
    /// CPU-intensive SVG rendering and PNG optimization.
    pub async fn render_png(
        &self,
        composition: Composition,
        scale: f64,
        background: Option<String>,
    ) -> Result<Vec<u8>, RenderError> {
        let renderer = self.svg_renderer.clone();

        tokio::task::spawn_blocking(move || {
            renderer.render_to_png(
                composition.svg.as_bytes(),
                composition.width,
                composition.height,
                scale,
                background.as_deref(),
            )
        })
        .await
        .map_err(|e| RenderError::SvgParse(format!("Render task failed: {e}")))?
    }

    /// Export a composition as a single-page PDF sized to the document
    pub async fn render_pdf(
        &self,
        composition: Composition,
        background: Option<String>,
    ) -> Result<Vec<u8>, RenderError> {
        let renderer = self.svg_renderer.clone();

        tokio::task::spawn_blocking(move || {
            renderer.render_to_pdf(
                composition.svg.as_bytes(),
                composition.width,
                composition.height,
                background.as_deref(),
            )
        })
        .await
        .map_err(|e| RenderError::PdfEncode(format!("Render task failed: {e}")))?
    }
}

impl Default for RenderService {
    fn default() -> Self {
        Self::new()
    }
}
