//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::repository::StoreError;
use crate::service::GraphError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    StorageError(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::StorageError(err) => {
                tracing::error!("Storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Validation(msg) => ApiError::BadRequest(msg),
            GraphError::NotFound(msg) => ApiError::NotFound(msg),
            GraphError::FailedPrecondition(msg) => ApiError::Conflict(msg),
            GraphError::Storage(StoreError::Conflict(msg)) => ApiError::Conflict(msg),
            GraphError::Storage(err) => ApiError::StorageError(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
