use super::SvgRenderer;
use crate::error::RenderError;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

const MM_PER_PT: f64 = 25.4 / 72.0;

/// Page fill used when the caller asks for no background; PDF viewers show
/// transparent regions inconsistently.
const DEFAULT_PAGE_BACKGROUND: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Single-page geometry: one point per user unit of the composed document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfPage {
    pub width_pt: f64,
    pub height_pt: f64,
    pub orientation: Orientation,
}

impl PdfPage {
    pub fn for_document(width: f64, height: f64) -> Self {
        let orientation = if width >= height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        Self {
            width_pt: width,
            height_pt: height,
            orientation,
        }
    }
}

impl SvgRenderer {
    /// Render an SVG document of `width`×`height` user units to a one-page
    /// PDF of the same size in points, embedding a scale-1 raster of it.
    pub fn render_to_pdf(
        &self,
        svg_data: &[u8],
        width: f64,
        height: f64,
        background: Option<&str>,
    ) -> Result<Vec<u8>, RenderError> {
        let page = PdfPage::for_document(width, height);
        let png_data = self.render_to_png(
            svg_data,
            width,
            height,
            1.0,
            Some(background.unwrap_or(DEFAULT_PAGE_BACKGROUND)),
        )?;

        let (doc, page1, layer1) = PdfDocument::new(
            "Logo",
            Mm((page.width_pt * MM_PER_PT) as f32),
            Mm((page.height_pt * MM_PER_PT) as f32),
            "Logo",
        );
        let current_layer = doc.get_page(page1).get_layer(layer1);

        let dynamic_image = printpdf::image_crate::load_from_memory(&png_data)
            .map_err(|e| RenderError::PdfEncode(format!("Failed to decode raster: {e}")))?;
        let rgb = dynamic_image.to_rgb8();
        let (pixel_width, pixel_height) = rgb.dimensions();
        let dynamic_image = printpdf::image_crate::DynamicImage::ImageRgb8(rgb);

        // at 72 dpi one pixel is one point; stretch the floored raster to the page
        let transform = ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            scale_x: Some((page.width_pt / f64::from(pixel_width)) as f32),
            scale_y: Some((page.height_pt / f64::from(pixel_height)) as f32),
            dpi: Some(72.0),
            ..Default::default()
        };
        Image::from_dynamic_image(&dynamic_image).add_to_layer(current_layer, transform);

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| RenderError::PdfEncode(e.to_string()))?;

        tracing::debug!(
            width = page.width_pt,
            height = page.height_pt,
            orientation = ?page.orientation,
            bytes = bytes.len(),
            "Rendered PDF"
        );
        Ok(bytes)
    }
}
