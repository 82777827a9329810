use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use svg_compose::{CanvasSettings, LayerRole, TextLayer};

use crate::error::ApiError;
use crate::models::{CanvasPatch, LogoSession, TextLayerPatch};
use crate::services::SessionStore;

/// Unwrap a JSON body, reporting malformed input as a validation error
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
            _ => ApiError::Validation(rejection.body_text()),
        })
}

fn layer_mut(session: &mut LogoSession, role: LayerRole) -> &mut TextLayer {
    match role {
        LayerRole::Logo => &mut session.logo_text,
        LayerRole::Slogan => &mut session.slogan_text,
    }
}

fn layer(session: &LogoSession, role: LayerRole) -> &TextLayer {
    match role {
        LayerRole::Logo => &session.logo_text,
        LayerRole::Slogan => &session.slogan_text,
    }
}

async fn patch_layer(
    sessions: &SessionStore,
    role: LayerRole,
    patch: TextLayerPatch,
) -> TextLayer {
    let updated = sessions
        .update(|session| {
            let layer = layer_mut(session, role);
            patch.apply(layer);
            layer.clone()
        })
        .await;
    tracing::debug!(layer = role.key(), "Text layer updated");
    updated
}

/// Get the logo text layer
#[utoipa::path(
    get,
    path = "/api/text/logo",
    responses((status = 200, description = "Logo text layer")),
    tag = "Layers"
)]
pub async fn handle_get_logo(State(sessions): State<Arc<SessionStore>>) -> Json<TextLayer> {
    Json(sessions.read(|s| layer(s, LayerRole::Logo).clone()).await)
}

/// Update the logo text layer. Absent fields are left unchanged; `null`
/// for `outline` or `shadow` removes the effect.
#[utoipa::path(
    patch,
    path = "/api/text/logo",
    responses(
        (status = 200, description = "Updated logo text layer"),
        (status = 400, description = "Malformed patch"),
    ),
    tag = "Layers"
)]
pub async fn handle_patch_logo(
    State(sessions): State<Arc<SessionStore>>,
    body: Result<Json<TextLayerPatch>, JsonRejection>,
) -> Result<Json<TextLayer>, ApiError> {
    let patch = json_body(body)?;
    Ok(Json(patch_layer(&sessions, LayerRole::Logo, patch).await))
}

/// Get the slogan text layer
#[utoipa::path(
    get,
    path = "/api/text/slogan",
    responses((status = 200, description = "Slogan text layer")),
    tag = "Layers"
)]
pub async fn handle_get_slogan(State(sessions): State<Arc<SessionStore>>) -> Json<TextLayer> {
    Json(sessions.read(|s| layer(s, LayerRole::Slogan).clone()).await)
}

/// Update the slogan text layer
#[utoipa::path(
    patch,
    path = "/api/text/slogan",
    responses(
        (status = 200, description = "Updated slogan text layer"),
        (status = 400, description = "Malformed patch"),
    ),
    tag = "Layers"
)]
pub async fn handle_patch_slogan(
    State(sessions): State<Arc<SessionStore>>,
    body: Result<Json<TextLayerPatch>, JsonRejection>,
) -> Result<Json<TextLayer>, ApiError> {
    let patch = json_body(body)?;
    Ok(Json(patch_layer(&sessions, LayerRole::Slogan, patch).await))
}

/// Get the canvas settings
#[utoipa::path(
    get,
    path = "/api/canvas",
    responses((status = 200, description = "Canvas settings")),
    tag = "Layers"
)]
pub async fn handle_get_canvas(
    State(sessions): State<Arc<SessionStore>>,
) -> Json<CanvasSettings> {
    Json(sessions.read(|s| s.canvas.clone()).await)
}

/// Update the canvas settings. Zoom is clamped to [0.25, 4].
#[utoipa::path(
    patch,
    path = "/api/canvas",
    responses(
        (status = 200, description = "Updated canvas settings"),
        (status = 400, description = "Malformed patch"),
    ),
    tag = "Layers"
)]
pub async fn handle_patch_canvas(
    State(sessions): State<Arc<SessionStore>>,
    body: Result<Json<CanvasPatch>, JsonRejection>,
) -> Result<Json<CanvasSettings>, ApiError> {
    let patch = json_body(body)?;
    let canvas = sessions
        .update(|session| {
            patch.apply(&mut session.canvas);
            session.canvas.clone()
        })
        .await;
    Ok(Json(canvas))
}
