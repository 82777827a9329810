//! Server integration tests that test the actual server behavior.
//!
//! These tests start a real TCP server and verify behavior that can only
//! be tested with actual network connections, plus the middleware stack.

mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use common::{assert_ok, assert_status, TestApp};
use logosmith::server::build_router;

/// Start a test server on an available port and return the port number.
async fn start_test_server() -> u16 {
    let state = TestApp::create_state();
    let app = build_router(state);

    // Bind to port 0 to get an available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    // Give the server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

    port
}

/// Send a raw HTTP/1.1 request and return the response head and body
async fn raw_request(port: u16, request: &str) -> String {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port))
        .await
        .expect("Failed to connect");

    stream
        .write_all(request.as_bytes())
        .await
        .expect("Failed to write request");

    let mut response = Vec::new();
    tokio::time::timeout(
        tokio::time::Duration::from_secs(2),
        stream.read_to_end(&mut response),
    )
    .await
    .expect("Timed out reading response")
    .expect("Failed to read response");

    String::from_utf8_lossy(&response).to_string()
}

#[tokio::test]
async fn test_health_over_tcp() {
    let port = start_test_server().await;
    let response = raw_request(
        port,
        "GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(
        response.starts_with("HTTP/1.1 200"),
        "Should get 200 OK response: {response}"
    );
    assert!(response.contains(r#"{"status":"ok"}"#));
}

#[tokio::test]
async fn test_cors_preflight_from_dev_origin() {
    let port = start_test_server().await;
    let response = raw_request(
        port,
        "OPTIONS /api/generate-symbol HTTP/1.1\r\n\
         Host: localhost\r\n\
         Origin: http://localhost:5173\r\n\
         Access-Control-Request-Method: POST\r\n\
         Access-Control-Request-Headers: content-type\r\n\
         Connection: close\r\n\r\n",
    )
    .await
    .to_lowercase();

    assert!(response.starts_with("http/1.1 200"), "{response}");
    assert!(
        response.contains("access-control-allow-origin: http://localhost:5173"),
        "Missing allow-origin: {response}"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let app = TestApp::new();
    let response = app
        .get_with_headers("/health", &[("Origin", "https://evil.example")])
        .await;

    assert_ok(&response);
    assert!(response.header("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_body_limit() {
    let app = TestApp::new();
    let huge = format!(r#"{{"prompt":"{}"}}"#, "x".repeat(2 * 1024 * 1024));
    let response = app.post_json("/api/generate-symbol", &huge).await;

    assert_status(&response, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.generator.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new();
    let response = app
        .request(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await;
    assert_status(&response, StatusCode::NOT_FOUND);
}
