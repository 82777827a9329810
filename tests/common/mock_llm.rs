//! Mock of the `/v1/responses` LLM endpoint.

use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer with convenience methods
pub struct MockLlmServer {
    pub server: MockServer,
}

impl MockLlmServer {
    /// Start a new mock LLM server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL to configure as `llm.base_url`
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Answer every authorized request with `text` as output_text
    pub async fn mock_answer(&self, api_key: &str, text: &str) {
        let body = serde_json::json!({
            "output": [
                { "type": "message", "content": [ { "type": "output_text", "text": text } ] }
            ]
        });
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(header("authorization", format!("Bearer {api_key}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer with a JSON body that carries no text item
    pub async fn mock_empty_answer(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"output": []})))
            .mount(&self.server)
            .await;
    }

    /// Fail every request with the given status
    pub async fn mock_error(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request received so far
    pub async fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
