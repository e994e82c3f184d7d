//! Pipeline version domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A numbered snapshot of a pipeline graph
///
/// At most one version per pipeline is in the `Draft` state. Published
/// versions never change once the state flips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineVersion {
    pub id: Uuid,
    pub pipeline_id: Uuid,
    pub number: i32,
    pub state: VersionState,
    pub metadata: VersionMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PipelineVersion {
    /// Builds a fresh draft row with empty metadata
    pub fn draft(id: Uuid, pipeline_id: Uuid, number: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            pipeline_id,
            number,
            state: VersionState::Draft,
            metadata: VersionMetadata::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.state == VersionState::Draft
    }
}

/// Lifecycle state of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionState {
    Draft,
    Published,
}

impl VersionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionState::Draft => "draft",
            VersionState::Published => "published",
        }
    }
}

impl std::fmt::Display for VersionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(VersionState::Draft),
            "published" => Ok(VersionState::Published),
            other => Err(format!("unknown version state '{}'", other)),
        }
    }
}

/// Free-form metadata attached to a version at publish time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parses_its_own_text() {
        for state in [VersionState::Draft, VersionState::Published] {
            assert_eq!(state.as_str().parse::<VersionState>(), Ok(state));
        }
        assert!("archived".parse::<VersionState>().is_err());
    }

    #[test]
    fn test_empty_metadata_serializes_to_empty_object() {
        let value = serde_json::to_value(VersionMetadata::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
