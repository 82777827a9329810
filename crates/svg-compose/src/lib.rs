//! svg-compose: sanitization and composition of untrusted SVG logo symbols
//!
//! Symbols arrive as SVG text produced by a language model, so they are
//! treated as hostile. Everything in this crate is a pure, synchronous
//! transform over its inputs; there is no shared state and no I/O.
//!
//! # Sanitizing
//!
//! ```
//! use svg_compose::{sanitize, DimensionPolicy};
//!
//! let raw = r#"<svg width="10"><script>alert(1)</script><path d="M0 0"/></svg>"#;
//! let clean = sanitize(raw, DimensionPolicy::FixedDimensions).unwrap();
//! assert_eq!(
//!     clean,
//!     r#"<svg xmlns="http://www.w3.org/2000/svg" width="1024" viewBox="0 0 1024 1024" height="1024"><path d="M0 0"/></svg>"#
//! );
//! ```
//!
//! The sanitizer parses into an owned tree, forces the canonical
//! `0 0 1024 1024` viewBox, removes `script`, `foreignObject`, `iframe`,
//! `image`, `audio` and `video` subtrees, strips `on*`, `xlink:*` and `href`
//! attributes, and re-serializes. Output longer than
//! [`MAX_SANITIZED_LEN`] characters is rejected, never truncated.
//!
//! # Composing
//!
//! ```
//! use svg_compose::{compose, CanvasSettings, TextLayer};
//!
//! let logo = TextLayer { text: "Acme".into(), ..TextLayer::logo_default() };
//! let slogan = TextLayer::slogan_default();
//! let canvas = CanvasSettings::default();
//!
//! let doc = compose(r#"<svg><circle r="10"/></svg>"#, &logo, &slogan, &canvas).unwrap();
//! assert_eq!(doc.width, 1024.0);
//! assert!(doc.svg.contains("Acme"));
//! ```
//!
//! The document is a vertical stack:
//!
//! ```text
//!  0 ┌──────────────────────┐
//!    │ symbol (1024 units)  │   grid overlay, if enabled
//! 1024├──────────────────────┤
//!    │ margin (80)          │
//!    │ logo   size×lh + 40  │   only if the logo text is non-blank
//!    │ slogan size×lh + 40  │   only if the slogan text is non-blank
//!    │ margin (80)          │
//!    └──────────────────────┘
//! ```
//!
//! where `lh` is the layer's line height clamped to `[0.8, 2]`.

pub mod canvas;
pub mod compose;
pub mod error;
pub mod sanitize;
pub mod text;
pub mod xml;


pub use canvas::CanvasSettings;
pub use compose::{compose, Composition, LayerRole, Layout};
pub use error::SvgError;
pub use sanitize::{
    sanitize, DimensionPolicy, SanitizedSvg, Sanitizer, CANONICAL_VIEW_BOX, MAX_SANITIZED_LEN,
};
pub use text::{case_transform, clamp, Align, Outline, Shadow, TextCase, TextLayer};
