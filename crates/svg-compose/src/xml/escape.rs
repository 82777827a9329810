//! XML escaping for text nodes and attribute values.
//!
//! Every string that reaches the output markup, whether it came from a
//! parsed document or from a user-configured text layer, goes through one of
//! these two functions. Characters that XML 1.0 forbids outright are
//! dropped rather than escaped, since no escape makes them legal.

/// Escape a string for use as XML character data.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    push_text(&mut out, input);
    out
}

/// Escape a string for use inside a double-quoted attribute value.
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    push_attr(&mut out, input);
    out
}

/// Whether `c` is a legal XML 1.0 `Char`.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

pub(crate) fn push_text(out: &mut String, input: &str) {
    for ch in input.chars().filter(|c| is_xml_char(*c)) {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

pub(crate) fn push_attr(out: &mut String, input: &str) {
    for ch in input.chars().filter(|c| is_xml_char(*c)) {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}
