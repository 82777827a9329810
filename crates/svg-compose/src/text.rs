//! Text-layer configuration and the pure transforms the composer applies to
//! it.

use serde::{Deserialize, Serialize};

/// Rendered line height is always clamped to this range, whatever is stored.
pub const LINE_HEIGHT_MIN: f64 = 0.8;
pub const LINE_HEIGHT_MAX: f64 = 2.0;

/// Minimum rendered outline thickness.
pub const OUTLINE_MIN_WIDTH: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

impl Align {
    /// SVG `text-anchor` value for this alignment.
    pub fn anchor(self) -> &'static str {
        match self {
            Align::Left => "start",
            Align::Center => "middle",
            Align::Right => "end",
        }
    }

    /// Horizontal anchor position within a frame of `width` with `margin` on
    /// both sides.
    pub fn x(self, width: f64, margin: f64) -> f64 {
        match self {
            Align::Left => margin,
            Align::Center => width / 2.0,
            Align::Right => width - margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    #[default]
    Normal,
    Uppercase,
    Lowercase,
}

/// Stroke painted beneath the fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub width: f64,
    pub color: String,
}

/// Drop shadow rendered through a filter primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub color: String,
}

/// A styled run of text (logo name or slogan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    #[serde(default)]
    pub text: String,
    pub font: String,
    pub size: f64,
    pub weight: u16,
    pub color: String,
    #[serde(default)]
    pub letter_spacing: f64,
    pub line_height: f64,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub case: TextCase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: "Inter".to_string(),
            size: 72.0,
            weight: 600,
            color: "#111827".to_string(),
            letter_spacing: 0.0,
            line_height: 1.1,
            align: Align::Center,
            case: TextCase::Normal,
            outline: None,
            shadow: None,
        }
    }
}

impl TextLayer {
    /// Default configuration for the logo-name layer.
    pub fn logo_default() -> Self {
        Self {
            size: 96.0,
            weight: 700,
            ..Self::default()
        }
    }

    /// Default configuration for the slogan layer.
    pub fn slogan_default() -> Self {
        Self {
            size: 36.0,
            weight: 400,
            color: "#4b5563".to_string(),
            ..Self::default()
        }
    }

    /// A layer renders only if its text has content other than whitespace
    /// and byte-order marks.
    pub fn has_text(&self) -> bool {
        !self
            .text
            .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
            .is_empty()
    }

    pub fn clamped_line_height(&self) -> f64 {
        clamp(self.line_height, LINE_HEIGHT_MIN, LINE_HEIGHT_MAX)
    }

    /// Vertical space reserved for this layer; zero when there is no text.
    pub fn block_height(&self) -> f64 {
        if self.has_text() {
            self.size * self.clamped_line_height()
        } else {
            0.0
        }
    }

    /// Text after the case transform, split into rendered lines.
    pub fn lines(&self) -> Vec<String> {
        split_lines(&case_transform(&self.text, self.case))
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Clamp `value` into `[min, max]`. NaN collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

pub fn case_transform(value: &str, variant: TextCase) -> String {
    match variant {
        TextCase::Normal => value.to_string(),
        TextCase::Uppercase => value.to_uppercase(),
        TextCase::Lowercase => value.to_lowercase(),
    }
}

/// Split on runs of one or more newline characters.
///
/// Blank lines in the middle collapse away, but a leading or trailing break
/// still yields one empty line, so `"a\n\nb"` is `["a", "b"]` and `"a\n"` is
/// `["a", ""]`.
pub fn split_lines(value: &str) -> Vec<&str> {
    let parts: Vec<&str> = value.split(is_newline).collect();
    let last = parts.len() - 1;
    parts
        .into_iter()
        .enumerate()
        .filter(|(i, part)| !part.is_empty() || *i == 0 || *i == last)
        .map(|(_, part)| part)
        .collect()
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}
