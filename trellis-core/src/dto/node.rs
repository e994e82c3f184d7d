//! Node DTOs

use serde::{Deserialize, Serialize};

use crate::domain::node::Position;

/// Request to add a node to the current draft
///
/// `config_json` is raw JSON text; an empty string stands for `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNode {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub config_json: String,
}

/// Request to change a node in the current draft
///
/// Empty strings keep the stored value. The position is always replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNode {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub config_json: String,
}
