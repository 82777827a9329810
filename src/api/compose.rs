use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use svg_compose::{CanvasSettings, Composition, TextLayer};
use utoipa::{IntoParams, ToSchema};

use super::layers::json_body;
use crate::error::ApiError;
use crate::models::{AppConfig, CanvasPatch, TextLayerPatch};
use crate::services::{RenderService, SessionStore};

/// Inputs for a stateless composition. Layers and canvas start from the
/// session defaults and take whatever fields are supplied.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    /// Symbol markup; sanitized before use
    pub symbol_svg: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub logo_text: TextLayerPatch,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub slogan_text: TextLayerPatch,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub canvas: CanvasPatch,
}

/// Query parameters for PNG export
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PngExportQuery {
    /// Raster scale factor (default 1)
    #[serde(default)]
    pub scale: Option<f64>,
    /// Hex color painted beneath the document
    #[serde(default)]
    pub background: Option<String>,
}

async fn compose_session(sessions: &SessionStore) -> Result<Composition, ApiError> {
    let session = sessions.snapshot().await;
    session.compose()?.ok_or(ApiError::NoSymbolSelected)
}

/// Compose the selected symbol with the session's text layers and canvas
#[utoipa::path(
    get,
    path = "/api/compose",
    responses(
        (status = 200, description = "Composed document with its size"),
        (status = 404, description = "No symbol selected"),
    ),
    tag = "Compose"
)]
pub async fn handle_compose_session(
    State(sessions): State<Arc<SessionStore>>,
) -> Result<Json<Composition>, ApiError> {
    Ok(Json(compose_session(&sessions).await?))
}

/// Compose explicit inputs without touching the session
#[utoipa::path(
    post,
    path = "/api/compose",
    request_body = ComposeRequest,
    responses(
        (status = 200, description = "Composed document with its size"),
        (status = 400, description = "Malformed request"),
        (status = 422, description = "Symbol markup rejected"),
    ),
    tag = "Compose"
)]
pub async fn handle_compose(
    body: Result<Json<ComposeRequest>, JsonRejection>,
) -> Result<Json<Composition>, ApiError> {
    let request = json_body(body)?;

    let mut logo = TextLayer::logo_default();
    request.logo_text.apply(&mut logo);
    let mut slogan = TextLayer::slogan_default();
    request.slogan_text.apply(&mut slogan);
    let mut canvas = CanvasSettings::default();
    request.canvas.apply(&mut canvas);

    let composition = svg_compose::compose(&request.symbol_svg, &logo, &slogan, &canvas)?;
    Ok(Json(composition))
}

/// Download the composed document as SVG
#[utoipa::path(
    get,
    path = "/api/export/svg",
    responses(
        (status = 200, description = "Composed SVG", body = String, content_type = "image/svg+xml"),
        (status = 404, description = "No symbol selected"),
    ),
    tag = "Export"
)]
pub async fn handle_export_svg(
    State(sessions): State<Arc<SessionStore>>,
) -> Result<Response, ApiError> {
    let composition = compose_session(&sessions).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"logo.svg\""),
        ],
        composition.svg,
    )
        .into_response())
}

/// Download the composed document as PNG
#[utoipa::path(
    get,
    path = "/api/export/png",
    params(PngExportQuery),
    responses(
        (status = 200, description = "Rendered PNG", body = Vec<u8>, content_type = "image/png"),
        (status = 400, description = "Invalid scale or background"),
        (status = 404, description = "No symbol selected"),
    ),
    tag = "Export"
)]
pub async fn handle_export_png(
    State(sessions): State<Arc<SessionStore>>,
    State(renderer): State<Arc<RenderService>>,
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<PngExportQuery>,
) -> Result<Response, ApiError> {
    let scale = query.scale.unwrap_or(1.0);
    let max_scale = f64::from(config.export.max_scale);
    if !(scale > 0.0 && scale <= max_scale) {
        return Err(ApiError::Validation(format!(
            "Scale must be greater than 0 and at most {max_scale}."
        )));
    }

    let composition = compose_session(&sessions).await?;
    let png = renderer
        .render_png(composition, scale, query.background)
        .await?;

    tracing::info!(scale = scale, bytes = png.len(), "PNG exported");

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"logo.png\""),
        ],
        png,
    )
        .into_response())
}

/// Query parameters for PDF export
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PdfExportQuery {
    /// Hex color for the page (default white)
    #[serde(default)]
    pub background: Option<String>,
}

/// Download the composed document as a one-page PDF sized to it
#[utoipa::path(
    get,
    path = "/api/export/pdf",
    params(PdfExportQuery),
    responses(
        (status = 200, description = "Rendered PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Invalid background"),
        (status = 404, description = "No symbol selected"),
    ),
    tag = "Export"
)]
pub async fn handle_export_pdf(
    State(sessions): State<Arc<SessionStore>>,
    State(renderer): State<Arc<RenderService>>,
    Query(query): Query<PdfExportQuery>,
) -> Result<Response, ApiError> {
    let composition = compose_session(&sessions).await?;
    let pdf = renderer.render_pdf(composition, query.background).await?;

    tracing::info!(bytes = pdf.len(), "PDF exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"logo.pdf\""),
        ],
        pdf,
    )
        .into_response())
}
