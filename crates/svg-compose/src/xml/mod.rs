//! Minimal XML layer: parse untrusted markup into an owned tree, mutate it,
//! and serialize it back with consistent escaping.

pub mod escape;
pub mod parse;
pub mod tree;

pub use escape::{escape_attr, escape_text, is_xml_char};
pub use parse::{parse_document, MAX_DEPTH};
pub use tree::{Attribute, Element, Node};
