use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use svg_compose::MAX_SANITIZED_LEN;
use utoipa::ToSchema;

use crate::models::SymbolVersion;
use crate::services::{SessionStore, SymbolError, SymbolService};

const PROMPT_MIN_CHARS: usize = 4;
const PROMPT_MAX_CHARS: usize = 1000;

/// Request body for /api/generate-symbol
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Description of the symbol to draw (4 to 1000 characters)
    pub prompt: String,
}

/// Request body for /api/iterate
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IterateRequest {
    /// Requested change
    pub prompt: String,
    /// Symbol to iterate from; defaults to the selected version
    #[serde(default)]
    pub base_svg: Option<String>,
}

/// Response from the symbol endpoints. On failure `svg` is empty and
/// `error` carries the message.
#[derive(Debug, Serialize, ToSchema)]
pub struct SymbolResponse {
    pub svg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<SymbolVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Failure of a symbol endpoint, rendered in the `{svg, error}` shape
#[derive(Debug)]
pub enum SymbolApiError {
    Validation(String),
    TooLarge,
    Failed(&'static str),
}

impl IntoResponse for SymbolApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SymbolApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            SymbolApiError::TooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body is too large.".to_string(),
            ),
            SymbolApiError::Failed(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };
        let body = SymbolResponse {
            svg: String::new(),
            version: None,
            error: Some(message),
        };
        (status, Json(body)).into_response()
    }
}

/// Collect every validation message, joined by a space
fn validate(prompt: &str, base_svg: Option<&str>) -> Result<(), SymbolApiError> {
    let mut problems = Vec::new();

    let prompt_len = prompt.chars().count();
    if prompt_len < PROMPT_MIN_CHARS {
        problems.push("Prompt must include at least four characters.");
    } else if prompt_len > PROMPT_MAX_CHARS {
        problems.push("Prompt is too long.");
    }

    if base_svg.is_some_and(|svg| svg.chars().count() >= MAX_SANITIZED_LEN) {
        problems.push("SVG is too large.");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(SymbolApiError::Validation(problems.join(" ")))
    }
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, SymbolApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => SymbolApiError::TooLarge,
            _ => SymbolApiError::Validation(rejection.body_text()),
        })
}

async fn store_version(sessions: &SessionStore, svg: String, prompt: String) -> SymbolVersion {
    sessions
        .update(|session| session.history.add(svg, prompt).clone())
        .await
}

/// Generate a new symbol from a prompt
///
/// The sanitized symbol is appended to the version history and selected.
#[utoipa::path(
    post,
    path = "/api/generate-symbol",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Symbol generated", body = SymbolResponse),
        (status = 400, description = "Invalid prompt", body = SymbolResponse),
        (status = 500, description = "Generation failed", body = SymbolResponse),
    ),
    tag = "Symbols"
)]
pub async fn handle_generate(
    State(symbols): State<Arc<SymbolService>>,
    State(sessions): State<Arc<SessionStore>>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<SymbolResponse>, SymbolApiError> {
    let request = parse_body(body)?;
    validate(&request.prompt, None)?;

    let svg = symbols.generate(&request.prompt).await.map_err(|e| {
        log_failure("/api/generate-symbol", &e);
        SymbolApiError::Failed("Symbol generation failed")
    })?;

    let version = store_version(&sessions, svg.clone(), request.prompt).await;
    tracing::info!(version_id = %version.id, "Symbol generated");

    Ok(Json(SymbolResponse {
        svg,
        version: Some(version),
        error: None,
    }))
}

/// Iterate on an existing symbol
///
/// Without `baseSvg` the currently selected version is used as the base.
#[utoipa::path(
    post,
    path = "/api/iterate",
    request_body = IterateRequest,
    responses(
        (status = 200, description = "Symbol iterated", body = SymbolResponse),
        (status = 400, description = "Invalid prompt or base SVG", body = SymbolResponse),
        (status = 500, description = "Iteration failed", body = SymbolResponse),
    ),
    tag = "Symbols"
)]
pub async fn handle_iterate(
    State(symbols): State<Arc<SymbolService>>,
    State(sessions): State<Arc<SessionStore>>,
    body: Result<Json<IterateRequest>, JsonRejection>,
) -> Result<Json<SymbolResponse>, SymbolApiError> {
    let request = parse_body(body)?;
    validate(&request.prompt, request.base_svg.as_deref())?;

    let base_svg = match request.base_svg.filter(|svg| !svg.is_empty()) {
        Some(svg) => Some(svg),
        None => {
            sessions
                .read(|session| session.history.current().map(|v| v.svg.clone()))
                .await
        }
    };

    let svg = symbols
        .iterate(&request.prompt, base_svg.as_deref())
        .await
        .map_err(|e| {
            log_failure("/api/iterate", &e);
            SymbolApiError::Failed("Iteration failed")
        })?;

    let version = store_version(&sessions, svg.clone(), request.prompt).await;
    tracing::info!(version_id = %version.id, "Symbol iterated");

    Ok(Json(SymbolResponse {
        svg,
        version: Some(version),
        error: None,
    }))
}

fn log_failure(route: &str, error: &SymbolError) {
    tracing::error!(route = route, error = %error, "Symbol request failed");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), SymbolApiError>) -> String {
        match result {
            Err(SymbolApiError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_prompt_bounds() {
        assert!(validate("a fox", None).is_ok());
        assert!(validate(&"x".repeat(1000), None).is_ok());
        assert_eq!(
            message(validate("fox", None)),
            "Prompt must include at least four characters."
        );
        assert_eq!(message(validate(&"x".repeat(1001), None)), "Prompt is too long.");
    }

    #[test]
    fn test_validate_counts_characters() {
        // four characters, twelve bytes
        assert!(validate("🦊🦊🦊🦊", None).is_ok());
    }

    #[test]
    fn test_validate_base_svg_size() {
        let big = "x".repeat(MAX_SANITIZED_LEN);
        assert_eq!(message(validate("a fox", Some(&big))), "SVG is too large.");
        assert!(validate("a fox", Some(&big[1..])).is_ok());
        assert_eq!(
            message(validate("fox", Some(&big))),
            "Prompt must include at least four characters. SVG is too large."
        );
    }

    #[test]
    fn test_error_response_status() {
        let response = SymbolApiError::Validation("bad".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = SymbolApiError::Failed("Iteration failed").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
