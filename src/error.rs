use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use svg_compose::SvgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("No symbol selected")]
    NoSymbolSelected,

    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error("Markup error: {0}")]
    Markup(#[from] SvgError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("PDF encode error: {0}")]
    PdfEncode(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::VersionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NoSymbolSelected => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Markup(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Render(RenderError::UnsupportedDimensions { .. })
            | ApiError::Render(RenderError::InvalidColor(_)) => StatusCode::BAD_REQUEST,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
