//! Pipeline API Handlers
//!
//! HTTP endpoints for pipeline management.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use trellis_core::domain::pipeline::Pipeline;
use trellis_core::dto::pipeline::{CreatePipeline, ProjectScope};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::pipeline_service;

/// POST /pipeline/create
/// Create a new pipeline and its first draft
pub async fn create_pipeline(
    State(state): State<AppState>,
    Json(req): Json<CreatePipeline>,
) -> ApiResult<Json<Pipeline>> {
    tracing::info!("Creating pipeline: {} in project {}", req.name, req.project_id);

    let pipeline = pipeline_service::create_pipeline(state.store.as_ref(), req).await?;

    Ok(Json(pipeline))
}

/// GET /pipeline/{id}
/// Get pipeline by ID
///
/// Query parameters:
/// - project_id: optional, the project that must own the pipeline
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<ProjectScope>,
) -> ApiResult<Json<Pipeline>> {
    tracing::debug!("Getting pipeline: {}", id);

    let pipeline = pipeline_service::get_pipeline(state.store.as_ref(), scope.target(id)).await?;

    Ok(Json(pipeline))
}
