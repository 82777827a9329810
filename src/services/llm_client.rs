use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::LlmConfig;

/// Instructions sent ahead of every symbol request
pub const SYSTEM_PROMPT: &str = "You generate a single, clean SVG symbol suitable for a logo. \
Output only the <svg ...>...</svg> markup. Use viewBox=\"0 0 1024 1024\". \
Avoid text; create paths/shapes only. No scripts, no external references, no raster images. \
Use fill=\"currentColor\" where possible so the client can recolor. \
Keep geometry balanced, centered, and with proper margins.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM API key not configured")]
    MissingApiKey,

    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("LLM did not return SVG text")]
    EmptyResponse,
}

/// Source of raw (unsanitized) symbol markup
#[async_trait]
pub trait SymbolGenerator: Send + Sync {
    /// Ask for a symbol matching `prompt`, optionally iterating on `base_svg`
    async fn generate(&self, prompt: &str, base_svg: Option<&str>)
        -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage>,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct InputMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output: Vec<OutputChunk>,
}

#[derive(Debug, Deserialize)]
struct OutputChunk {
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesBody {
    /// First `output_text`/`text` item across all output chunks
    fn into_text(self) -> Option<String> {
        self.output
            .into_iter()
            .flat_map(|chunk| chunk.content)
            .find(|item| item.kind == "output_text" || item.kind == "text")
            .and_then(|item| item.text)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Client for an OpenAI-compatible `/v1/responses` endpoint
pub struct OpenAiClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.api_key.is_none() {
            tracing::warn!("Missing OPENAI_API_KEY. Requests to the LLM API will fail.");
        }

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/responses", self.config.base_url.trim_end_matches('/'))
    }

    fn build_input(prompt: &str, base_svg: Option<&str>) -> Vec<InputMessage> {
        let mut input = vec![InputMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        }];
        if let Some(base) = base_svg.filter(|s| !s.is_empty()) {
            input.push(InputMessage {
                role: "user",
                content: format!("Here is the previous SVG to iterate from:\n\n{base}"),
            });
        }
        input.push(InputMessage {
            role: "user",
            content: prompt.to_string(),
        });
        input
    }
}

#[async_trait]
impl SymbolGenerator for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        base_svg: Option<&str>,
    ) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let body = ResponsesRequest {
            model: &self.config.model,
            input: Self::build_input(prompt, base_svg),
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        };

        tracing::debug!(
            model = %self.config.model,
            iterating = base_svg.is_some(),
            "Requesting symbol from LLM"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ResponsesBody = response.json().await?;
        parsed.into_text().ok_or(GenerationError::EmptyResponse)
    }
}
