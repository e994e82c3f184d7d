//! Execution DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::graph::EnvironmentMode;

/// Request to run a pipeline graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutePipeline {
    #[serde(default)]
    pub mode: EnvironmentMode,
    #[serde(default)]
    pub trigger_input: String,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    /// Deadline for each call to the completion backend
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}
