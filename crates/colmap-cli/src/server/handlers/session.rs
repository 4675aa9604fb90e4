//! Session handlers: one per user action.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use colmap::{ColmapError, MemorySink, SessionView};
use serde::Deserialize;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query for uploads.
#[derive(Deserialize)]
pub struct FileQuery {
    pub name: String,
}

/// Request body naming a column.
#[derive(Deserialize)]
pub struct ColumnRequest {
    pub column: String,
}

/// Request body naming a suggestion key.
#[derive(Deserialize)]
pub struct KeyRequest {
    pub key: String,
}

/// Request body choosing a mapping for a key.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub key: String,
    pub selected_mapping: String,
}

/// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.read().await.view())
}

/// POST /api/session/file?name=<file>
pub async fn load_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
    body: Bytes,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    session.load_file(&query.name, &body)?;
    Ok(Json(session.view()))
}

/// POST /api/session/columns/toggle
pub async fn toggle_column(
    State(state): State<AppState>,
    Json(req): Json<ColumnRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    session.toggle_column(&req.column)?;
    Ok(Json(session.view()))
}

/// POST /api/session/submit
///
/// The session lock is released while the suggestion service is called.
pub async fn submit(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let (ticket, request) = state.session.write().await.begin_submission()?;

    let client = Arc::clone(&state.client);
    let result = tokio::task::spawn_blocking(move || client.request_suggestions(&request))
        .await
        .unwrap_or_else(|e| Err(ColmapError::Service(format!("suggestion task failed: {}", e))));

    let mut session = state.session.write().await;
    session.complete_submission(ticket, result)?;
    Ok(Json(session.view()))
}

/// POST /api/session/decisions/toggle
pub async fn toggle_decision(
    State(state): State<AppState>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    session.toggle_acceptance(&req.key)?;
    Ok(Json(session.view()))
}

/// POST /api/session/decisions/select
pub async fn select_decision(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    session.select_alternative(&req.key, &req.selected_mapping)?;
    Ok(Json(session.view()))
}

/// POST /api/session/apply
pub async fn apply(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    session.apply()?;
    Ok(Json(session.view()))
}

/// GET /api/session/download
pub async fn download(State(state): State<AppState>) -> Result<Response, ApiError> {
    let sink = MemorySink::new();
    let artifact = state.session.write().await.export(&sink)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        artifact.file_name.replace('"', "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.contents,
    )
        .into_response())
}

/// POST /api/session/back
pub async fn back(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let mut session = state.session.write().await;
    session.back_to_selection()?;
    Ok(Json(session.view()))
}

/// POST /api/session/reset
pub async fn reset(State(state): State<AppState>) -> Json<SessionView> {
    let mut session = state.session.write().await;
    session.start_over();
    Json(session.view())
}
