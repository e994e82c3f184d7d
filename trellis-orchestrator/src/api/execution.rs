//! Execution API Handlers
//!
//! HTTP endpoint for running a pipeline.

use axum::{
    Json,
    extract::{Path, State},
};
use trellis_core::domain::execution::ExecutionReport;
use trellis_core::dto::execution::ExecutePipeline;
use trellis_core::dto::pipeline::PipelineRef;
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::execution_service;

/// POST /pipeline/{id}/execute
/// Run a pipeline once and return every node's result
pub async fn execute_pipeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ExecutePipeline>,
) -> ApiResult<Json<ExecutionReport>> {
    tracing::info!("Executing pipeline {} ({:?})", id, req.mode);

    let target = PipelineRef {
        pipeline_id: id,
        project_id: req.project_id,
    };
    let report = execution_service::execute_pipeline(
        state.store.as_ref(),
        state.engine.as_ref(),
        target,
        req,
    )
    .await?;

    Ok(Json(report))
}
