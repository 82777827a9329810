//! Test application factory for integration tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use logosmith::models::AppConfig;
use logosmith::server::{build_router, create_app_state, create_app_state_with_generator, AppState};
use logosmith::services::{GenerationError, SessionStore, SymbolGenerator};

use super::fixtures;
use super::mock_llm::MockLlmServer;

/// Generator that replays canned model answers and records the requests it saw
#[derive(Default)]
pub struct ScriptedGenerator {
    answers: Mutex<VecDeque<Result<String, String>>>,
    pub calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful answer
    pub fn answer(&self, text: &str) -> &Self {
        self.answers.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    /// Queue an upstream failure
    pub fn fail(&self, body: &str) -> &Self {
        self.answers.lock().unwrap().push_back(Err(body.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_base_svg(&self) -> Option<String> {
        self.calls.lock().unwrap().last().and_then(|(_, b)| b.clone())
    }
}

#[async_trait]
impl SymbolGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        base_svg: Option<&str>,
    ) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), base_svg.map(str::to_string)));

        // An empty script answers with the default symbol
        match self.answers.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(body)) => Err(GenerationError::Status { status: 500, body }),
            None => Ok(fixtures::symbols::CIRCLE.to_string()),
        }
    }
}

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub sessions: Arc<SessionStore>,
    pub generator: Arc<ScriptedGenerator>,
}

impl TestApp {
    /// Create a test application backed by a scripted generator
    pub fn new() -> Self {
        Self::with_generator(Arc::new(ScriptedGenerator::new()))
    }

    pub fn with_generator(generator: Arc<ScriptedGenerator>) -> Self {
        let state = create_app_state_with_generator(AppConfig::default(), generator.clone());
        let sessions = state.sessions.clone();
        let router = build_router(state);

        Self {
            router,
            sessions,
            generator,
        }
    }

    /// Create a test application that talks to a mock LLM API over HTTP
    pub fn with_llm(server: &MockLlmServer, api_key: Option<&str>) -> Self {
        let mut config = AppConfig::default();
        config.llm.base_url = server.url();
        config.llm.api_key = api_key.map(str::to_string);
        config.llm.timeout_secs = 5;

        let state = create_app_state(config).expect("Failed to create app state");
        let sessions = state.sessions.clone();
        let router = build_router(state);

        Self {
            router,
            sessions,
            generator: Arc::new(ScriptedGenerator::new()),
        }
    }

    /// Create state for custom router configuration
    pub fn create_state() -> AppState {
        create_app_state_with_generator(AppConfig::default(), Arc::new(ScriptedGenerator::new()))
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        self.send_json("POST", path, body).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch_json(&self, path: &str, body: &str) -> TestResponse {
        self.send_json("PATCH", path, body).await
    }

    /// Make a PUT request without body
    pub async fn put(&self, path: &str) -> TestResponse {
        self.request(Request::put(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    async fn send_json(&self, method: &str, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Generate a symbol through the API and return the new version id
    pub async fn generate(&self, prompt: &str) -> String {
        let body = serde_json::json!({ "prompt": prompt }).to_string();
        let response = self.post_json("/api/generate-symbol", &body).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());

        let json: serde_json::Value = response.json();
        json["version"]["id"].as_str().unwrap().to_string()
    }

    /// Send a request to the router
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Value of a response header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Check if response is a PDF document
    pub fn is_pdf(&self) -> bool {
        self.body.starts_with(b"%PDF-")
    }

    /// Width and height of the first page's MediaBox, in points
    pub fn pdf_page_size(&self) -> (f64, f64) {
        assert!(self.is_pdf(), "Not a PDF");
        let key = b"/MediaBox";
        let start = self
            .body
            .windows(key.len())
            .position(|w| w == key)
            .expect("PDF has no MediaBox");
        let rest = &self.body[start + key.len()..];
        let open = rest.iter().position(|b| *b == b'[').unwrap();
        let close = rest.iter().position(|b| *b == b']').unwrap();
        let numbers: Vec<f64> = std::str::from_utf8(&rest[open + 1..close])
            .unwrap()
            .split_whitespace()
            .map(|n| n.parse().unwrap())
            .collect();
        (numbers[2] - numbers[0], numbers[3] - numbers[1])
    }

    /// Pixel size from the PNG IHDR chunk
    pub fn png_size(&self) -> (u32, u32) {
        assert!(self.is_png(), "Not a PNG");
        let word = |at: usize| u32::from_be_bytes(self.body[at..at + 4].try_into().unwrap());
        (word(16), word(20))
    }
}
