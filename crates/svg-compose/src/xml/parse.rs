use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::escape::is_xml_char;
use super::tree::{Attribute, Element, Node};
use crate::error::SvgError;

/// Maximum element nesting accepted from untrusted input.
pub const MAX_DEPTH: usize = 512;

/// Parse a complete XML document into an owned tree and return its root.
///
/// Comments, processing instructions, the XML declaration and any doctype
/// are dropped. Whitespace outside the root element is ignored; any other
/// content there, a second root, an unclosed or mismatched tag, a bad
/// attribute or an unknown entity is an error. So is any character XML
/// forbids, including ones that only appear after unescaping (`&#1;`).
pub fn parse_document(input: &str) -> Result<Element, SvgError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(SvgError::invalid(format!(
                    "{e} (at byte {})",
                    reader.buffer_position()
                )))
            }
        };

        match event {
            Event::Start(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(SvgError::invalid(format!(
                        "elements nested deeper than {MAX_DEPTH} levels"
                    )));
                }
                if stack.is_empty() && root.is_some() {
                    return Err(SvgError::invalid("multiple root elements"));
                }
                stack.push(open_element(&start)?);
            }
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(end) => {
                let name = decode_name(end.name().as_ref())?;
                let element = stack.pop().ok_or_else(|| {
                    SvgError::invalid(format!("unexpected closing tag </{name}>"))
                })?;
                if element.name != name {
                    return Err(SvgError::invalid(format!(
                        "closing tag </{name}> does not match <{}>",
                        element.name
                    )));
                }
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|e| SvgError::invalid(format!("bad character data: {e}")))?;
                check_chars(&value, "character data")?;
                match stack.last_mut() {
                    Some(parent) => push_text(parent, &value),
                    None if value.trim().is_empty() => {}
                    None => {
                        return Err(SvgError::invalid(
                            "text content outside the root element",
                        ))
                    }
                }
            }
            Event::CData(cdata) => {
                let value = String::from_utf8(cdata.into_inner().into_owned())
                    .map_err(|_| SvgError::invalid("CDATA section is not valid UTF-8"))?;
                check_chars(&value, "CDATA section")?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::CData(value)),
                    None => {
                        return Err(SvgError::invalid(
                            "CDATA section outside the root element",
                        ))
                    }
                }
            }
            Event::Eof => break,
            // comments, declarations, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SvgError::invalid(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| SvgError::invalid("document contains no elements"))
}

fn open_element(start: &BytesStart) -> Result<Element, SvgError> {
    let mut element = Element::new(decode_name(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            SvgError::invalid(format!("malformed attribute on <{}>: {e}", element.name))
        })?;
        let name = decode_name(attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::invalid(format!("bad value for attribute {name}: {e}")))?
            .into_owned();
        check_chars(&value, &format!("attribute {name}"))?;
        element.attributes.push(Attribute { name, value });
    }
    Ok(element)
}

fn check_chars(value: &str, context: &str) -> Result<(), SvgError> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(SvgError::invalid(format!(
            "character U+{:04X} is not allowed in XML ({context})",
            c as u32
        ))),
        None => Ok(()),
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), SvgError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(SvgError::invalid("multiple root elements")),
    }
}

/// Append character data, merging with a preceding text node.
fn push_text(parent: &mut Element, value: &str) {
    if let Some(Node::Text(existing)) = parent.children.last_mut() {
        existing.push_str(value);
    } else {
        parent.children.push(Node::Text(value.to_string()));
    }
}

fn decode_name(raw: &[u8]) -> Result<String, SvgError> {
    let name = std::str::from_utf8(raw)
        .map_err(|_| SvgError::invalid("element or attribute name is not valid UTF-8"))?;
    if name.is_empty() {
        return Err(SvgError::invalid("empty element or attribute name"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let root = parse_document(
            r#"<?xml version="1.0"?><svg viewBox="0 0 10 10"><rect width="5"/></svg>"#,
        )
        .unwrap();
        assert_eq!(root.name, "svg");
        assert_eq!(root.attr("viewBox"), Some("0 0 10 10"));
        assert_eq!(root.child_elements().next().unwrap().name, "rect");
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let root = parse_document(r#"<svg><text title="a &amp; b">x &lt; y</text></svg>"#)
            .unwrap();
        let text = root.child_elements().next().unwrap();
        assert_eq!(text.attr("title"), Some("a & b"));
        assert_eq!(text.children, vec![Node::Text("x < y".to_string())]);
    }

    #[test]
    fn test_parse_drops_comments_and_merges_text() {
        let root = parse_document("<svg>a<!-- hidden -->b</svg>").unwrap();
        assert_eq!(root.children, vec![Node::Text("ab".to_string())]);
    }

    #[test]
    fn test_parse_keeps_cdata() {
        let root = parse_document("<svg><style><![CDATA[rect{fill:red}]]></style></svg>")
            .unwrap();
        let style = root.child_elements().next().unwrap();
        assert_eq!(style.children, vec![Node::CData("rect{fill:red}".to_string())]);
    }

    #[test]
    fn test_parse_rejects_unclosed() {
        let err = parse_document("<svg><g>").unwrap_err();
        assert!(matches!(err, SvgError::InvalidMarkup(_)));
    }

    #[test]
    fn test_parse_rejects_mismatched() {
        assert!(parse_document("<svg><g></svg>").is_err());
    }

    #[test]
    fn test_parse_rejects_text_outside_root() {
        assert!(parse_document("Here is your logo: <svg/>").is_err());
    }

    #[test]
    fn test_parse_rejects_two_roots() {
        assert!(parse_document("<svg/><svg/>").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_entity() {
        assert!(parse_document("<svg>&nbsp;</svg>").is_err());
    }

    #[test]
    fn test_parse_rejects_forbidden_characters() {
        for input in [
            "<svg><text>a&#1;b</text></svg>",
            "<svg><text>a\u{1}b</text></svg>",
            "<svg><text>&#xB;</text></svg>",
            "<svg><text>&#xFFFE;</text></svg>",
            "<svg><text title=\"x&#31;\">t</text></svg>",
            "<svg><style><![CDATA[a\u{c}]]></style></svg>",
        ] {
            let err = parse_document(input).unwrap_err();
            assert!(matches!(err, SvgError::InvalidMarkup(_)), "{input:?}");
        }
    }

    #[test]
    fn test_parse_accepts_allowed_control_characters() {
        let root = parse_document("<svg><text>a&#9;b&#10;c&#13;</text></svg>").unwrap();
        let text = root.child_elements().next().unwrap();
        assert_eq!(text.children, vec![Node::Text("a\tb\nc\r".to_string())]);
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(parse_document("").is_err());
        assert!(parse_document("   \n").is_err());
    }

    #[test]
    fn test_parse_rejects_excessive_nesting() {
        let depth = MAX_DEPTH + 1;
        let input = format!("{}{}", "<g>".repeat(depth), "</g>".repeat(depth));
        assert!(parse_document(&input).is_err());
    }
}
