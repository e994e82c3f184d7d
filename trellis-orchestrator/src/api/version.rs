//! Version API Handlers
//!
//! HTTP endpoints for the draft/publish lifecycle.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use trellis_core::domain::version::PipelineVersion;
use trellis_core::dto::pipeline::ProjectScope;
use trellis_core::dto::version::{PublishVersion, PublishedVersion};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::version_service;

/// GET /pipeline/{id}/versions
/// List every version of a pipeline, newest first
pub async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<ProjectScope>,
) -> ApiResult<Json<Vec<PipelineVersion>>> {
    tracing::debug!("Listing versions of pipeline: {}", id);

    let versions = version_service::list_versions(state.store.as_ref(), scope.target(id)).await?;

    Ok(Json(versions))
}

/// POST /pipeline/{id}/draft
/// Get the current draft, creating it if the pipeline has none
pub async fn ensure_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<ProjectScope>,
) -> ApiResult<Json<PipelineVersion>> {
    tracing::info!("Ensuring draft of pipeline: {}", id);

    let draft = version_service::ensure_draft(state.store.as_ref(), scope.target(id)).await?;

    Ok(Json(draft))
}

/// POST /pipeline/{id}/publish
/// Publish the current draft
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<ProjectScope>,
    Json(req): Json<PublishVersion>,
) -> ApiResult<Json<PublishedVersion>> {
    tracing::info!("Publishing pipeline: {}", id);

    let published = version_service::publish(state.store.as_ref(), scope.target(id), req).await?;

    Ok(Json(published))
}
