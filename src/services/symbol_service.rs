use std::sync::Arc;
use svg_compose::{DimensionPolicy, Sanitizer, SvgError};
use thiserror::Error;

use super::llm_client::{GenerationError, SymbolGenerator};

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Invalid SVG returned by the model: {0}")]
    Sanitize(#[from] SvgError),
}

/// Produces sanitized symbols from prompts.
///
/// Raw model text never leaves this service: it is unwrapped from any
/// surrounding prose and run through the fixed-dimension sanitizer first.
pub struct SymbolService {
    generator: Arc<dyn SymbolGenerator>,
    sanitizer: Sanitizer,
}

impl SymbolService {
    pub fn new(generator: Arc<dyn SymbolGenerator>) -> Self {
        Self {
            generator,
            sanitizer: Sanitizer::new(DimensionPolicy::FixedDimensions),
        }
    }

    /// Generate a fresh symbol
    pub async fn generate(&self, prompt: &str) -> Result<String, SymbolError> {
        self.request(prompt, None).await
    }

    /// Generate a symbol using `base_svg` as the starting point
    pub async fn iterate(&self, prompt: &str, base_svg: Option<&str>) -> Result<String, SymbolError> {
        self.request(prompt, base_svg).await
    }

    async fn request(&self, prompt: &str, base_svg: Option<&str>) -> Result<String, SymbolError> {
        let raw = self.generator.generate(prompt, base_svg).await?;
        let markup = extract_svg_markup(&raw);
        let svg = self.sanitizer.sanitize(markup)?;

        tracing::info!(
            raw_len = raw.len(),
            sanitized_len = svg.len(),
            "Symbol sanitized"
        );
        Ok(svg)
    }
}

/// Slice the `<svg ... </svg>` span out of model text that may carry a
/// Markdown fence or prose around it. Returns the trimmed input if no span
/// is found.
pub fn extract_svg_markup(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("<svg") else {
        return trimmed;
    };
    match trimmed.rfind("</svg>") {
        Some(end) if end > start => &trimmed[start..end + "</svg>".len()],
        _ => &trimmed[start..],
    }
}
