//! Project API Handlers
//!
//! HTTP endpoints for project management.

use axum::{
    Json,
    extract::{Path, State},
};
use trellis_core::domain::project::Project;
use trellis_core::dto::pipeline::PipelineSummary;
use trellis_core::dto::project::CreateProject;
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::{pipeline_service, project_service};

/// POST /project/create
/// Create a new project
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProject>,
) -> ApiResult<Json<Project>> {
    tracing::info!("Creating project: {}", req.name);

    let project = project_service::create_project(state.store.as_ref(), req).await?;

    Ok(Json(project))
}

/// GET /project/list
/// List all projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    tracing::debug!("Listing all projects");

    let projects = project_service::list_projects(state.store.as_ref()).await?;

    Ok(Json(projects))
}

/// GET /project/{project_id}/pipelines
/// List the pipelines of a project
pub async fn list_project_pipelines(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<PipelineSummary>>> {
    tracing::debug!("Listing pipelines of project: {}", project_id);

    let pipelines = pipeline_service::list_pipelines(state.store.as_ref(), project_id).await?;

    Ok(Json(pipelines))
}
