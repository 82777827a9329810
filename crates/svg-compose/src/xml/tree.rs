//! Owned, mutable XML tree.
//!
//! Nodes own their children outright; removal is an explicit detach from the
//! parent's child list, so there is no live view that can go stale while a
//! traversal is mutating it.

use super::escape::{push_attr, push_text};

/// A single `name="value"` pair, stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A node in the tree. Comments, processing instructions and doctype
/// declarations are not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written in the source, e.g. `svg` or `svg:path`.
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping its position if it already exists and
    /// appending it otherwise.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| a.name != name);
        self.attributes.len() != before
    }

    /// Iterate over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Consume the tree and return the first element (in document order,
    /// starting with `self`) whose local name is `local`.
    pub fn into_first_named(self, local: &str) -> Option<Element> {
        if self.local_name() == local {
            return Some(self);
        }
        self.children.into_iter().find_map(|node| match node {
            Node::Element(e) => e.into_first_named(local),
            _ => None,
        })
    }

    /// Serialize this element and its subtree.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    /// Serialize only the children, without the element's own tags.
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_to(&mut out);
        }
        out
    }

    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attributes {
            out.push(' ');
            out.push_str(&attr.name);
            out.push_str("=\"");
            push_attr(out, &attr.value);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl Node {
    pub fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(e) => e.write_to(out),
            Node::Text(t) => push_text(out, t),
            Node::CData(c) => {
                out.push_str("<![CDATA[");
                out.push_str(c);
                out.push_str("]]>");
            }
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        let mut root = Element::new("svg");
        root.set_attr("xmlns", "http://www.w3.org/2000/svg");
        let mut path = Element::new("path");
        path.set_attr("d", "M0 0L10 10");
        root.children.push(Node::Element(path));
        root.children.push(Node::Text("a<b".to_string()));
        root
    }

    #[test]
    fn test_set_attr_keeps_position() {
        let mut e = Element::new("svg");
        e.set_attr("viewBox", "0 0 10 10");
        e.set_attr("fill", "red");
        e.set_attr("viewBox", "0 0 1024 1024");
        let names: Vec<_> = e.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["viewBox", "fill"]);
        assert_eq!(e.attr("viewBox"), Some("0 0 1024 1024"));
    }

    #[test]
    fn test_remove_attr() {
        let mut e = Element::new("svg");
        e.set_attr("width", "10");
        assert!(e.remove_attr("width"));
        assert!(!e.remove_attr("width"));
        assert!(e.attributes.is_empty());
    }

    #[test]
    fn test_local_name_strips_prefix() {
        assert_eq!(Element::new("svg:script").local_name(), "script");
        assert_eq!(Element::new("rect").local_name(), "rect");
    }

    #[test]
    fn test_markup_serialization() {
        assert_eq!(
            sample().to_markup(),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0L10 10"/>a&lt;b</svg>"#
        );
        assert_eq!(sample().inner_markup(), r#"<path d="M0 0L10 10"/>a&lt;b"#);
    }

    #[test]
    fn test_into_first_named_descends() {
        let mut wrapper = Element::new("html");
        wrapper.children.push(Node::Element(sample()));
        let found = wrapper.into_first_named("svg").unwrap();
        assert_eq!(found.name, "svg");
        assert_eq!(found.child_elements().count(), 1);
    }
}
