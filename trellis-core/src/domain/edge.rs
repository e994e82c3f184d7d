//! Edge domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A directed link from one node's output to another node's input
///
/// Both endpoints belong to the edge's own version and are never equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: Uuid,
    pub version_id: Uuid,
    pub source: Uuid,
    pub target: Uuid,
    pub label: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Edge {
    /// Copies this edge into another version with already translated endpoints
    pub fn fork(&self, id: Uuid, version_id: Uuid, source: Uuid, target: Uuid) -> Edge {
        Edge {
            id,
            version_id,
            source,
            target,
            label: self.label.clone(),
            created_at: chrono::Utc::now(),
        }
    }
}
