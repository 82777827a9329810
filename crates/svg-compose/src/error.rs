use thiserror::Error;

/// Failure modes of the sanitizer (and, transitively, the composer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvgError {
    /// The input could not be parsed, or contained no `<svg>` element.
    #[error("Invalid SVG markup: {0}")]
    InvalidMarkup(String),

    /// The sanitized serialization exceeded the size bound.
    #[error("SVG document too large: {size} characters (max {max})")]
    OversizedDocument { size: usize, max: usize },
}

impl SvgError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SvgError::InvalidMarkup(reason.into())
    }
}
