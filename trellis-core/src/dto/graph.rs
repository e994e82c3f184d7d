//! Graph query DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::graph::EnvironmentMode;

/// Query parameters for reading a pipeline graph
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub mode: EnvironmentMode,
    #[serde(default)]
    pub project_id: Option<Uuid>,
}
