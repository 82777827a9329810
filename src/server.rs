//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{HeaderValue, Method},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::models::AppConfig;
use crate::services::{OpenAiClient, RenderService, SessionStore, SymbolGenerator, SymbolService};

/// Largest accepted request body
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionStore>,
    pub symbols: Arc<SymbolService>,
    pub renderer: Arc<RenderService>,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<SymbolService> {
    fn from_ref(state: &AppState) -> Self {
        state.symbols.clone()
    }
}

impl FromRef<AppState> for Arc<RenderService> {
    fn from_ref(state: &AppState) -> Self {
        state.renderer.clone()
    }
}

/// Create application state backed by the configured LLM endpoint.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let client = OpenAiClient::new(config.llm.clone())
        .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {e}"))?;
    Ok(create_app_state_with_generator(config, Arc::new(client)))
}

/// Create application state around an arbitrary symbol generator.
pub fn create_app_state_with_generator(
    config: AppConfig,
    generator: Arc<dyn SymbolGenerator>,
) -> AppState {
    AppState {
        config: Arc::new(config),
        sessions: Arc::new(SessionStore::new()),
        symbols: Arc::new(SymbolService::new(generator)),
        renderer: Arc::new(RenderService::new()),
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        // Symbol generation
        .route("/api/generate-symbol", post(api::handle_generate))
        .route("/api/iterate", post(api::handle_iterate))
        // Version history
        .route("/api/versions", get(api::handle_list_versions))
        .route("/api/versions/:id/select", put(api::handle_select_version))
        .route("/api/versions/:id", delete(api::handle_delete_version))
        .route("/api/session", delete(api::handle_reset_session))
        // Text layers and canvas
        .route(
            "/api/text/logo",
            get(api::handle_get_logo).patch(api::handle_patch_logo),
        )
        .route(
            "/api/text/slogan",
            get(api::handle_get_slogan).patch(api::handle_patch_slogan),
        )
        .route(
            "/api/canvas",
            get(api::handle_get_canvas).patch(api::handle_patch_canvas),
        )
        // Composition and export
        .route(
            "/api/compose",
            get(api::handle_compose_session).post(api::handle_compose),
        )
        .route("/api/export/svg", get(api::handle_export_svg))
        .route("/api/export/png", get(api::handle_export_png))
        .route("/api/export/pdf", get(api::handle_export_pdf))
        // Health check
        .route("/health", get(health))
        // Add state and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}
