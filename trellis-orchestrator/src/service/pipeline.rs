//! Pipeline Service
//!
//! Business logic for pipeline management.

use trellis_core::domain::pipeline::Pipeline;
use trellis_core::dto::pipeline::{CreatePipeline, PipelineRef, PipelineSummary};
use uuid::Uuid;

use crate::repository::{GraphStore, UnitOfWork};
use crate::service::{GraphError, Result, version_service};

/// Create a new pipeline together with its first draft
pub async fn create_pipeline(store: &dyn GraphStore, req: CreatePipeline) -> Result<Pipeline> {
    validate_pipeline_request(&req)?;

    let mut uow = store.begin().await?;

    uow.find_project(req.project_id)
        .await?
        .ok_or_else(|| GraphError::NotFound(format!("Project not found: {}", req.project_id)))?;

    let pipeline = Pipeline {
        id: Uuid::new_v4(),
        project_id: req.project_id,
        name: req.name.trim().to_string(),
        description: req.description.trim().to_string(),
        last_published_version_id: None,
        created_at: chrono::Utc::now(),
    };

    uow.insert_pipeline(&pipeline).await?;
    version_service::ensure_draft_in(uow.as_mut(), pipeline.id).await?;
    uow.commit().await?;

    tracing::info!("Pipeline created: {} ({})", pipeline.name, pipeline.id);

    Ok(pipeline)
}

/// Get a pipeline by ID
pub async fn get_pipeline(store: &dyn GraphStore, target: PipelineRef) -> Result<Pipeline> {
    let mut uow = store.begin().await?;
    load_pipeline(uow.as_mut(), target).await
}

/// List the pipelines of a project with their last published version number
pub async fn list_pipelines(
    store: &dyn GraphStore,
    project_id: Uuid,
) -> Result<Vec<PipelineSummary>> {
    let mut uow = store.begin().await?;

    uow.find_project(project_id)
        .await?
        .ok_or_else(|| GraphError::NotFound(format!("Project not found: {}", project_id)))?;

    let pipelines = uow.list_pipelines(project_id).await?;
    let mut summaries = Vec::with_capacity(pipelines.len());

    for pipeline in pipelines {
        let version = match pipeline.last_published_version_id {
            Some(version_id) => uow
                .find_version(version_id)
                .await?
                .map(|v| v.number)
                .unwrap_or(0),
            None => 0,
        };

        summaries.push(PipelineSummary {
            id: pipeline.id,
            name: pipeline.name,
            description: pipeline.description,
            version,
        });
    }

    Ok(summaries)
}

/// Loads the addressed pipeline, enforcing the optional project scope
pub(crate) async fn load_pipeline(uow: &mut dyn UnitOfWork, target: PipelineRef) -> Result<Pipeline> {
    let pipeline = uow.find_pipeline(target.pipeline_id).await?;
    scoped(pipeline, target)
}

/// Like [`load_pipeline`], but holds the pipeline exclusively until the unit
/// of work ends. Every version-mutating operation starts here.
pub(crate) async fn lock_pipeline(uow: &mut dyn UnitOfWork, target: PipelineRef) -> Result<Pipeline> {
    let pipeline = uow.lock_pipeline(target.pipeline_id).await?;
    scoped(pipeline, target)
}

fn scoped(pipeline: Option<Pipeline>, target: PipelineRef) -> Result<Pipeline> {
    match pipeline {
        Some(p) if target.project_id.is_none_or(|project_id| p.project_id == project_id) => Ok(p),
        _ => Err(GraphError::NotFound(format!(
            "Pipeline not found: {}",
            target.pipeline_id
        ))),
    }
}

// =============================================================================
// Validation
// =============================================================================

fn validate_pipeline_request(req: &CreatePipeline) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(GraphError::Validation(
            "Pipeline name cannot be empty".to_string(),
        ));
    }

    if req.name.len() > 255 {
        return Err(GraphError::Validation(
            "Pipeline name is too long (max 255 characters)".to_string(),
        ));
    }

    Ok(())
}
