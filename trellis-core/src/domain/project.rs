//! Project domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A project groups pipelines together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
