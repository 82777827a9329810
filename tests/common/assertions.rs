//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );
    assert_eq!(
        response.header("content-type"),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert response is a PDF document
pub fn assert_pdf(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_pdf(),
        "Expected PDF, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..5.min(response.body.len())]
    );
    assert_eq!(
        response.header("content-type"),
        Some("application/pdf"),
        "Expected Content-Type: application/pdf"
    );
}

/// Assert a symbol endpoint failed with the `{svg: "", error}` shape
pub fn assert_symbol_error(response: &TestResponse, expected: StatusCode, message: &str) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["svg"], "");
    assert_eq!(json["error"], message);
}

/// Assert a generic API error with its JSON status field
pub fn assert_api_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(expected.as_u16() as u64));
    assert!(json["error"].is_string(), "Expected error message");
}

/// Assert markup is a sanitized symbol: canonical frame, nothing active left
pub fn assert_sanitized_symbol(svg: &str) {
    assert!(svg.starts_with("<svg"), "Expected <svg root: {svg}");
    assert!(svg.contains(r#"viewBox="0 0 1024 1024""#), "Missing viewBox: {svg}");
    assert!(svg.contains(r#"width="1024""#), "Missing width: {svg}");
    assert!(svg.contains(r#"height="1024""#), "Missing height: {svg}");
    for needle in ["<script", "<foreignObject", "<image", " on", "href="] {
        assert!(!svg.contains(needle), "Found {needle:?} in {svg}");
    }
}
