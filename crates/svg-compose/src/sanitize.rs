//! Sanitization of untrusted SVG markup.
//!
//! The same rules apply on every call site; the only configurable part is
//! how the root element's `width`/`height` are treated ([`DimensionPolicy`]).

use serde::{Deserialize, Serialize};

use crate::error::SvgError;
use crate::xml::{parse_document, Element, Node};

/// Canonical coordinate box forced onto every sanitized symbol.
pub const CANONICAL_VIEW_BOX: &str = "0 0 1024 1024";

/// Edge length of the canonical coordinate box, in user units.
pub const CANONICAL_SIZE: u32 = 1024;

/// Maximum length of a sanitized document, in characters.
pub const MAX_SANITIZED_LEN: usize = 500_000;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Elements removed together with their whole subtree.
pub const DENIED_ELEMENTS: [&str; 6] = [
    "script",
    "foreignObject",
    "iframe",
    "image",
    "audio",
    "video",
];

/// How the root element's presentation size is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DimensionPolicy {
    /// Force `width="1024" height="1024"`, producing a fixed-size document.
    /// Used on raw model output before it is stored.
    #[default]
    FixedDimensions,
    /// Drop `width`/`height` so the embedding document controls sizing.
    /// Used when a symbol is re-embedded during composition.
    ViewBoxOnly,
}

/// Result of a successful sanitization: the mutated root plus its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSvg {
    root: Element,
    markup: String,
}

impl SanitizedSvg {
    /// The serialized, sanitized document.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn into_markup(self) -> String {
        self.markup
    }

    /// Children of the root `<svg>`, serialized without the wrapper tags.
    pub fn inner_markup(&self) -> String {
        self.root.inner_markup()
    }

    pub fn root(&self) -> &Element {
        &self.root
    }
}

/// Configurable sanitizer.
///
/// ```
/// use svg_compose::{DimensionPolicy, Sanitizer};
///
/// let svg = r#"<svg onload="alert(1)" viewBox="0 0 10 10"><circle r="4"/></svg>"#;
/// let clean = Sanitizer::new(DimensionPolicy::ViewBoxOnly).sanitize(svg).unwrap();
/// assert!(!clean.contains("onload"));
/// assert!(clean.contains(r#"viewBox="0 0 1024 1024""#));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    policy: DimensionPolicy,
    max_len: usize,
}

impl Sanitizer {
    pub fn new(policy: DimensionPolicy) -> Self {
        Self {
            policy,
            max_len: MAX_SANITIZED_LEN,
        }
    }

    /// Override the maximum output length.
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn policy(&self) -> DimensionPolicy {
        self.policy
    }

    /// Sanitize and return the serialized document.
    pub fn sanitize(&self, raw: &str) -> Result<String, SvgError> {
        self.run(raw).map(SanitizedSvg::into_markup)
    }

    /// Sanitize and keep the tree around for callers that need to re-embed
    /// the content.
    pub fn run(&self, raw: &str) -> Result<SanitizedSvg, SvgError> {
        let document = parse_document(raw)?;
        let mut root = document
            .into_first_named("svg")
            .ok_or_else(|| SvgError::invalid("no root <svg> element"))?;

        if root.attr("xmlns").is_none() {
            root.attributes.insert(
                0,
                crate::xml::Attribute {
                    name: "xmlns".to_string(),
                    value: SVG_NAMESPACE.to_string(),
                },
            );
        }
        root.set_attr("viewBox", CANONICAL_VIEW_BOX);
        match self.policy {
            DimensionPolicy::FixedDimensions => {
                let size = CANONICAL_SIZE.to_string();
                root.set_attr("width", size.clone());
                root.set_attr("height", size);
            }
            DimensionPolicy::ViewBoxOnly => {
                root.remove_attr("width");
                root.remove_attr("height");
            }
        }

        let mut report = ScrubReport::default();
        scrub(&mut root, &mut report);

        let markup = root.to_markup();
        let size = markup.chars().count();
        if size > self.max_len {
            tracing::debug!(size, max = self.max_len, "Sanitized SVG exceeds size bound");
            return Err(SvgError::OversizedDocument {
                size,
                max: self.max_len,
            });
        }

        tracing::trace!(
            policy = ?self.policy,
            removed_elements = report.elements,
            removed_attributes = report.attributes,
            len = size,
            "Sanitized SVG"
        );

        Ok(SanitizedSvg { root, markup })
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DimensionPolicy::default())
    }
}

/// Sanitize with the default size bound.
pub fn sanitize(raw: &str, policy: DimensionPolicy) -> Result<String, SvgError> {
    Sanitizer::new(policy).sanitize(raw)
}

/// Whether an element (by local name) is removed outright. Matching ignores
/// ASCII case because HTML parsers fold tag case when the markup is later
/// injected inline.
pub fn is_denied_element(local_name: &str) -> bool {
    DENIED_ELEMENTS
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(local_name))
}

/// Whether an attribute is stripped: event handlers (`on*`), anything in the
/// `xlink:` namespace, and `href`. All comparisons ignore ASCII case.
pub fn is_denied_attribute(name: &str) -> bool {
    starts_with_ignore_case(name, "on")
        || starts_with_ignore_case(name, "xlink:")
        || name.eq_ignore_ascii_case("href")
}

#[derive(Debug, Default)]
struct ScrubReport {
    elements: usize,
    attributes: usize,
}

/// Depth-first removal of denied elements and attributes. Denied children
/// are detached before the survivors are visited, so nothing under a removed
/// subtree is ever traversed.
fn scrub(element: &mut Element, report: &mut ScrubReport) {
    let before = element.attributes.len();
    element.attributes.retain(|a| !is_denied_attribute(&a.name));
    report.attributes += before - element.attributes.len();

    let before = element.children.len();
    element.children.retain(|node| match node {
        Node::Element(child) => !is_denied_element(child.local_name()),
        _ => true,
    });
    report.elements += before - element.children.len();

    for node in &mut element.children {
        if let Node::Element(child) = node {
            scrub(child, report);
        }
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
