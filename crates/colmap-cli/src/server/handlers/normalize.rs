//! Normalize handler: samples in, suggestions out.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use colmap::{suggestion::API_KEY_ENV, ColmapError, SuggestionRequest, SuggestionSet};
use tracing::{info, warn};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// POST /api/normalize
///
/// 400 when the body is not `{"data": {...}}` with at least one field, 502
/// when the model reply is not valid JSON, 500 when the provider fails.
pub async fn normalize(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<SuggestionSet>, ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::BadRequest(format!("Invalid input data: {}", e.body_text())))?;
    if request.is_empty() {
        return Err(ApiError::BadRequest(
            "Invalid input data: no fields given".to_string(),
        ));
    }

    let normalizer = state.normalizer.clone().ok_or_else(|| {
        ApiError::Internal(format!("Chat provider not configured; set {}", API_KEY_ENV))
    })?;

    info!(fields = request.len(), "normalize request");
    let result = tokio::task::spawn_blocking(move || normalizer.complete(&request))
        .await
        .map_err(|e| ApiError::Internal(format!("normalize task failed: {}", e)))?;

    match result {
        Ok(set) => Ok(Json(set)),
        Err(ColmapError::Json(e)) => {
            warn!(error = %e, "model returned invalid JSON");
            Err(ApiError::BadGateway(format!("Model returned invalid JSON: {}", e)))
        }
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}
