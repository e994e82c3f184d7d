//! Health Check API Handler
//!
//! Reports whether the store accepts new units of work.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::api::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.begin().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
