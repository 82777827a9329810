use crate::error::RenderError;
use resvg::usvg::{self, Transform};
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Largest raster edge accepted for export, in pixels
pub const MAX_EXPORT_DIMENSION: u32 = 8192;

/// Rasterizes composed logo documents to PNG.
///
/// Text layers reference font families by name, so the renderer carries a
/// font database; families that are not installed fall back to whatever
/// fontdb resolves for the generic family.
pub struct SvgRenderer {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
}

impl SvgRenderer {
    /// Create a renderer with the given extra font files plus system fonts
    pub fn with_fonts(fonts: Vec<(String, Vec<u8>)>) -> Self {
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data);
            tracing::debug!(font = %name, "Loaded font");
        }

        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            "Loaded fonts for SVG text rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Create a renderer with system fonts only
    pub fn new() -> Self {
        Self::with_fonts(Vec::new())
    }

    /// Render an SVG document of `width`×`height` user units to PNG at
    /// `scale`, painting `background` (a hex color) beneath it if given.
    ///
    /// Output pixel size is `floor(width * scale)` × `floor(height * scale)`.
    pub fn render_to_png(
        &self,
        svg_data: &[u8],
        width: f64,
        height: f64,
        scale: f64,
        background: Option<&str>,
    ) -> Result<Vec<u8>, RenderError> {
        let (pixel_width, pixel_height) = pixel_size(width, height, scale)?;
        let background = background.map(parse_hex_color).transpose()?;

        let pixmap = self.rasterize_svg(svg_data, pixel_width, pixel_height, background)?;
        let png_bytes = encode_png(&pixmap)?;

        // Re-compress with oxipng; fall back to the fast encoding on failure
        let optimized = oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                ..Default::default()
            },
        )
        .unwrap_or(png_bytes);

        tracing::debug!(
            width = pixel_width,
            height = pixel_height,
            bytes = optimized.len(),
            "Rendered PNG"
        );
        Ok(optimized)
    }

    /// Parse and rasterize SVG to an RGBA pixmap, stretched to the target size
    fn rasterize_svg(
        &self,
        svg_data: &[u8],
        pixel_width: u32,
        pixel_height: u32,
        background: Option<tiny_skia::Color>,
    ) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let svg_size = tree.size();
        let scale_x = pixel_width as f32 / svg_size.width();
        let scale_y = pixel_height as f32 / svg_size.height();

        let mut pixmap =
            Pixmap::new(pixel_width, pixel_height).ok_or(RenderError::PixmapAllocation)?;
        if let Some(color) = background {
            pixmap.fill(color);
        }

        resvg::render(
            &tree,
            Transform::from_scale(scale_x, scale_y),
            &mut pixmap.as_mut(),
        );

        Ok(pixmap)
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Compute the raster size, rejecting empty or oversized results
fn pixel_size(width: f64, height: f64, scale: f64) -> Result<(u32, u32), RenderError> {
    let w = (width * scale).floor();
    let h = (height * scale).floor();
    let clamp = |v: f64| {
        if v.is_finite() {
            v.clamp(0.0, u32::MAX as f64) as u32
        } else {
            0
        }
    };
    let (w, h) = (clamp(w), clamp(h));
    if w == 0 || h == 0 || w > MAX_EXPORT_DIMENSION || h > MAX_EXPORT_DIMENSION {
        return Err(RenderError::UnsupportedDimensions {
            width: w,
            height: h,
        });
    }
    Ok((w, h))
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
pub fn parse_hex_color(value: &str) -> Result<tiny_skia::Color, RenderError> {
    let invalid = || RenderError::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let (r, g, b, a) = match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
            (expand(0)?, expand(1)?, expand(2)?, 255)
        }
        6 => (
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ),
        8 => (
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ),
        _ => return Err(invalid()),
    };
    Ok(tiny_skia::Color::from_rgba8(r, g, b, a))
}

/// Encode a pixmap as 8-bit RGBA PNG (un-premultiplying alpha)
fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
