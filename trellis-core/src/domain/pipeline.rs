//! Pipeline domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, versioned agent graph owned by a project
///
/// The only field that changes after creation is `last_published_version_id`,
/// which is moved forward by every successful publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: String,
    pub last_published_version_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
