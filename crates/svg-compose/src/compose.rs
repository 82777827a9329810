//! Composition of a sanitized symbol with the logo and slogan text layers.
//!
//! The layout is a fixed vertical stack: symbol region, logo text, slogan
//! text, with a trailing margin. All geometry is in canonical user units.

use serde::Serialize;

use crate::canvas::CanvasSettings;
use crate::error::SvgError;
use crate::sanitize::{DimensionPolicy, Sanitizer};
use crate::text::{Shadow, TextLayer, OUTLINE_MIN_WIDTH};
use crate::xml::{escape_attr, escape_text, Element};

pub const CANVAS_WIDTH: f64 = 1024.0;
pub const SYMBOL_HEIGHT: f64 = 1024.0;
pub const MARGIN: f64 = 80.0;
pub const GRID_TILE: u32 = 40;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const GRID_PATTERN_ID: &str = "canvas-grid";
const GRID_STROKE: &str = "rgba(17, 24, 39, 0.08)";
const GRID_OPACITY: f64 = 0.7;

/// The merged document and its size in user units (1 unit = 1 px).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub svg: String,
    pub width: f64,
    pub height: f64,
}

/// Which text layer is being rendered. Determines the filter id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    Logo,
    Slogan,
}

impl LayerRole {
    pub fn key(self) -> &'static str {
        match self {
            LayerRole::Logo => "logo",
            LayerRole::Slogan => "slogan",
        }
    }

    pub fn shadow_filter_id(self) -> String {
        format!("{}-shadow", self.key())
    }
}

/// Vertical placement of every region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    /// Top edge of the symbol region.
    pub symbol_top: f64,
    /// Baseline origin of the logo text.
    pub logo_y: f64,
    /// Baseline origin of the slogan text.
    pub slogan_y: f64,
}

impl Layout {
    pub fn compute(logo: &TextLayer, slogan: &TextLayer) -> Self {
        let mut cursor = SYMBOL_HEIGHT + MARGIN;

        let logo_y = cursor;
        if logo.has_text() {
            cursor += logo.block_height() + MARGIN / 2.0;
        }

        let slogan_y = cursor;
        if slogan.has_text() {
            cursor += slogan.block_height() + MARGIN / 2.0;
        }

        Self {
            width: CANVAS_WIDTH,
            height: cursor + MARGIN,
            symbol_top: 0.0,
            logo_y,
            slogan_y,
        }
    }
}

/// Compose a symbol with both text layers on the configured canvas.
///
/// The symbol is always sanitized here, even if it already went through the
/// sanitizer upstream, because history entries can be replayed from storage.
pub fn compose(
    symbol_svg: &str,
    logo: &TextLayer,
    slogan: &TextLayer,
    canvas: &CanvasSettings,
) -> Result<Composition, SvgError> {
    let symbol = Sanitizer::new(DimensionPolicy::ViewBoxOnly).run(symbol_svg)?;
    let inner_symbol = symbol.inner_markup();
    let symbol_namespaces = namespace_declarations(symbol.root());

    let layout = Layout::compute(logo, slogan);
    let mut defs: Vec<String> = Vec::new();

    let logo_markup = render_text(logo, LayerRole::Logo, layout.logo_y, &mut defs);
    let slogan_markup = render_text(slogan, LayerRole::Slogan, layout.slogan_y, &mut defs);

    if canvas.show_grid {
        defs.push(grid_pattern());
    }

    let width = fmt_num(layout.width);
    let height = fmt_num(layout.height);

    let mut body: Vec<String> = Vec::new();
    if !defs.is_empty() {
        body.push(format!("<defs>{}</defs>", defs.concat()));
    }
    if let Some(fill) = canvas.background_fill() {
        body.push(format!(
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape_attr(fill)
        ));
    }
    if canvas.show_grid {
        body.push(format!(
            r#"<rect x="0" y="{}" width="{width}" height="{}" fill="url(#{GRID_PATTERN_ID})" opacity="{}"/>"#,
            fmt_num(layout.symbol_top),
            fmt_num(SYMBOL_HEIGHT),
            fmt_num(GRID_OPACITY),
        ));
    }
    body.push(format!(
        r#"<g transform="translate(0 {})"{symbol_namespaces}>{inner_symbol}</g>"#,
        fmt_num(layout.symbol_top)
    ));
    body.extend(logo_markup);
    body.extend(slogan_markup);

    let svg = format!(
        "<svg xmlns=\"{SVG_NAMESPACE}\" viewBox=\"0 0 {width} {height}\" width=\"{width}\" height=\"{height}\">\n  {}\n</svg>",
        body.join("\n  ")
    );

    tracing::debug!(
        width = layout.width,
        height = layout.height,
        logo = logo.has_text(),
        slogan = slogan.has_text(),
        grid = canvas.show_grid,
        len = svg.len(),
        "Composed logo document"
    );

    Ok(Composition {
        svg,
        width: layout.width,
        height: layout.height,
    })
}

/// Namespace declarations from the symbol root, rendered as attributes for
/// the group that replaces it. The default SVG namespace is already declared
/// on the outer document.
fn namespace_declarations(root: &Element) -> String {
    let mut out = String::new();
    for attr in &root.attributes {
        let declares = attr.name.starts_with("xmlns:")
            || (attr.name == "xmlns" && attr.value != SVG_NAMESPACE);
        if declares {
            out.push_str(&format!(r#" {}="{}""#, attr.name, escape_attr(&attr.value)));
        }
    }
    out
}

/// Build the `<text>` element for a layer, pushing any filter it needs into
/// `defs`. Returns `None` for an empty layer.
fn render_text(
    layer: &TextLayer,
    role: LayerRole,
    y: f64,
    defs: &mut Vec<String>,
) -> Option<String> {
    if !layer.has_text() {
        return None;
    }

    let x = fmt_num(layer.align.x(CANVAS_WIDTH, MARGIN));
    let line_step = layer.clamped_line_height() * layer.size;

    let mut spans = String::new();
    for (index, line) in layer.lines().iter().enumerate() {
        let dy = if index == 0 {
            "0".to_string()
        } else {
            format!("{}px", fmt_num(line_step))
        };
        spans.push_str(&format!(
            r#"<tspan x="{x}" dy="{dy}">{}</tspan>"#,
            escape_text(line)
        ));
    }

    let mut attrs = format!(
        r#"font-family="{}" font-size="{}" font-weight="{}" fill="{}" letter-spacing="{}px" text-anchor="{}""#,
        escape_attr(&layer.font),
        fmt_num(layer.size),
        layer.weight,
        escape_attr(&layer.color),
        fmt_fixed2(layer.letter_spacing),
        layer.align.anchor(),
    );

    if let Some(outline) = &layer.outline {
        attrs.push_str(&format!(
            r#" stroke="{}" stroke-width="{}" paint-order="stroke fill""#,
            escape_attr(&outline.color),
            fmt_num(outline.width.max(OUTLINE_MIN_WIDTH)),
        ));
    }

    if let Some(shadow) = &layer.shadow {
        let id = role.shadow_filter_id();
        defs.push(shadow_filter(&id, shadow));
        attrs.push_str(&format!(r#" filter="url(#{id})""#));
    }

    Some(format!(
        r#"<text {attrs} y="{}" xml:space="preserve">{spans}</text>"#,
        fmt_num(y)
    ))
}

fn shadow_filter(id: &str, shadow: &Shadow) -> String {
    format!(
        r#"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}"/></filter>"#,
        fmt_num(shadow.x),
        fmt_num(shadow.y),
        fmt_num(shadow.blur),
        escape_attr(&shadow.color),
    )
}

fn grid_pattern() -> String {
    format!(
        r#"<pattern id="{GRID_PATTERN_ID}" width="{GRID_TILE}" height="{GRID_TILE}" patternUnits="userSpaceOnUse"><path d="M {GRID_TILE} 0 L 0 0 0 {GRID_TILE}" fill="none" stroke="{GRID_STROKE}" stroke-width="1"/></pattern>"#
    )
}

/// Shortest round-trip decimal form; non-finite values and negative zero
/// render as `0`.
pub(crate) fn fmt_num(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn fmt_fixed2(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_string();
    }
    let formatted = format!("{value:.2}");
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}
