//! Test fixtures and constants.

/// Symbol markup as a model might return it
pub mod symbols {
    /// Clean symbol
    pub const CIRCLE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1024 1024"><circle cx="512" cy="512" r="300" fill="currentColor"/></svg>"#;

    /// Symbol carrying every kind of active content
    pub const HOSTILE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 10 10" width="10" height="10" onload="alert(1)"><script>alert(1)</script><foreignObject><div>x</div></foreignObject><image href="http://evil/x.png"/><a xlink:href="http://evil"><rect width="4" height="4" onclick="steal()"/></a><use href="#r"/></svg>"##;

    /// Model answer wrapped in prose and a Markdown fence
    pub const FENCED: &str = "Sure! Here is your logo:\n```svg\n<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\"><path d=\"M0 0L24 24\"/></svg>\n```\nLet me know if you want changes.";

    /// Editor export carrying its own namespace on inner attributes
    pub const INKSCAPE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" viewBox="0 0 100 100"><path inkscape:label="mark" d="M0 0 L100 100 Z"/></svg>"#;

    /// Square symbol with an odd viewBox
    pub const SQUARE: &str = r##"<svg viewBox="0 0 50 50" width="50"><rect x="5" y="5" width="40" height="40" fill="#0ea5e9"/></svg>"##;
}

/// Request bodies
pub mod bodies {
    pub fn prompt(prompt: &str) -> String {
        serde_json::json!({ "prompt": prompt }).to_string()
    }

    pub fn iterate(prompt: &str, base_svg: Option<&str>) -> String {
        match base_svg {
            Some(svg) => serde_json::json!({ "prompt": prompt, "baseSvg": svg }).to_string(),
            None => self::prompt(prompt),
        }
    }
}
