//! Pipeline DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a new pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipeline {
    pub project_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Lightweight pipeline summary for listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Number of the last published version, 0 if never published
    pub version: i32,
}

/// Addresses a pipeline, optionally scoped to the project that must own it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRef {
    pub pipeline_id: Uuid,
    #[serde(default)]
    pub project_id: Option<Uuid>,
}

impl PipelineRef {
    pub fn new(pipeline_id: Uuid) -> Self {
        Self {
            pipeline_id,
            project_id: None,
        }
    }

    pub fn in_project(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// Optional project scope carried as a query string on pipeline routes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectScope {
    #[serde(default)]
    pub project_id: Option<Uuid>,
}

impl ProjectScope {
    /// Addresses `pipeline_id` within this scope
    pub fn target(self, pipeline_id: Uuid) -> PipelineRef {
        let target = PipelineRef::new(pipeline_id);
        match self.project_id {
            Some(project_id) => target.in_project(project_id),
            None => target,
        }
    }
}
