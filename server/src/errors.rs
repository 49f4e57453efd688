//! API errors mapped to HTTP status codes with a `{"error": "..."}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use search_core::IndexError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// 400
    BadRequest(String),
    /// 404
    NotFound(String),
    /// 500
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<IndexError> for ApiError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvalidQuery(_) => ApiError::BadRequest(err.to_string()),
            IndexError::NotFound(_) => ApiError::NotFound(err.to_string()),
            IndexError::SearchFailure(_) => {
                tracing::error!(error = %err, "search failed");
                ApiError::Internal(format!("Search error: {err}"))
            }
            // unreachable from the current routes, which only read the index
            IndexError::IndexingFailure { .. } => {
                tracing::error!(error = %err, "indexing failed");
                ApiError::Internal(format!("Indexing error: {err}"))
            }
        }
    }
}
