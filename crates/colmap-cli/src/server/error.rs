//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use colmap::ColmapError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// The upstream model answered with something unusable.
    BadGateway(String),
    /// Internal server error.
    Internal(String),
    /// Error from the colmap library.
    Colmap(ColmapError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg.clone()),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg.clone())
            }
            ApiError::Colmap(e) => {
                let (status, error) = match e {
                    ColmapError::FileFormat(_)
                    | ColmapError::EmptySelection
                    | ColmapError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid"),
                    ColmapError::InvalidPhase { .. }
                    | ColmapError::Busy
                    | ColmapError::StaleResponse => (StatusCode::CONFLICT, "conflict"),
                    ColmapError::Service(_) => (StatusCode::BAD_GATEWAY, "service"),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
                };
                (status, error, e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<ColmapError> for ApiError {
    fn from(err: ColmapError) -> Self {
        ApiError::Colmap(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Colmap(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}
