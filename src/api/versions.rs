use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{VersionHistory, VersionId};
use crate::services::SessionStore;

/// List symbol versions, newest first, with the selected id
#[utoipa::path(
    get,
    path = "/api/versions",
    responses(
        (status = 200, description = "Version history", body = VersionHistory),
    ),
    tag = "Versions"
)]
pub async fn handle_list_versions(
    State(sessions): State<Arc<SessionStore>>,
) -> Json<VersionHistory> {
    Json(sessions.read(|session| session.history.clone()).await)
}

/// Select a version for composition
#[utoipa::path(
    put,
    path = "/api/versions/{id}/select",
    params(("id" = String, Path, description = "Version id")),
    responses(
        (status = 200, description = "Version selected", body = VersionHistory),
        (status = 404, description = "Unknown version"),
    ),
    tag = "Versions"
)]
pub async fn handle_select_version(
    State(sessions): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> Result<Json<VersionHistory>, ApiError> {
    let id = VersionId::new(id);
    let history = sessions
        .update(|session| {
            session
                .history
                .select(&id)
                .then(|| session.history.clone())
        })
        .await
        .ok_or_else(|| ApiError::VersionNotFound(id.to_string()))?;

    tracing::debug!(version_id = %id, "Version selected");
    Ok(Json(history))
}

/// Delete a version
///
/// Deleting the selected version moves the selection to the newest
/// remaining one.
#[utoipa::path(
    delete,
    path = "/api/versions/{id}",
    params(("id" = String, Path, description = "Version id")),
    responses(
        (status = 200, description = "Version deleted", body = VersionHistory),
        (status = 404, description = "Unknown version"),
    ),
    tag = "Versions"
)]
pub async fn handle_delete_version(
    State(sessions): State<Arc<SessionStore>>,
    Path(id): Path<String>,
) -> Result<Json<VersionHistory>, ApiError> {
    let id = VersionId::new(id);
    let history = sessions
        .update(|session| {
            session
                .history
                .remove(&id)
                .map(|_| session.history.clone())
        })
        .await
        .ok_or_else(|| ApiError::VersionNotFound(id.to_string()))?;

    tracing::info!(
        version_id = %id,
        remaining = history.len(),
        "Version deleted"
    );
    Ok(Json(history))
}

/// Reset the session: history, text layers and canvas return to defaults
#[utoipa::path(
    delete,
    path = "/api/session",
    responses(
        (status = 204, description = "Session reset"),
    ),
    tag = "Versions"
)]
pub async fn handle_reset_session(State(sessions): State<Arc<SessionStore>>) -> StatusCode {
    sessions.update(|session| session.reset()).await;
    tracing::info!("Session reset");
    StatusCode::NO_CONTENT
}
