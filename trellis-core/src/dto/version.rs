//! Version DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to publish the current draft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishVersion {
    #[serde(default)]
    pub notes: String,
}

/// Identity of a freshly published version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedVersion {
    pub version_id: Uuid,
    pub version_number: i32,
}
