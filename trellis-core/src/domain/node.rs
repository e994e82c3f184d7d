//! Node domain types

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A unit of pipeline work stored against one version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub version_id: Uuid,
    /// Human-readable identifier, unique within the version
    pub key: String,
    pub label: String,
    pub category: NodeCategory,
    #[serde(rename = "type")]
    pub node_type: String,
    pub status: NodeStatus,
    pub position: Position,
    pub config: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Node {
    /// Copies this node into another version under a new identity.
    ///
    /// Everything except the identity and version is carried over; the status
    /// is reset to idle.
    pub fn fork(&self, id: Uuid, version_id: Uuid) -> Node {
        Node {
            id,
            version_id,
            key: self.key.clone(),
            label: self.label.clone(),
            category: self.category.clone(),
            node_type: self.node_type.clone(),
            status: NodeStatus::Idle,
            position: self.position,
            config: self.config.clone(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Canvas coordinates of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Execution status of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Idle => "idle",
            NodeStatus::Running => "running",
            NodeStatus::Completed => "completed",
            NodeStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "idle" => Ok(NodeStatus::Idle),
            "running" => Ok(NodeStatus::Running),
            "completed" => Ok(NodeStatus::Completed),
            "error" => Ok(NodeStatus::Error),
            other => Err(format!("unknown node status '{}'", other)),
        }
    }
}

/// Capability family of a node, used to pick its execution handler
///
/// Parsing is case-insensitive. Anything outside the known families is kept
/// verbatim in `Other` and handled by the passthrough handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeCategory {
    Llm,
    Data,
    Services,
    Utility,
    Other(String),
}

impl NodeCategory {
    pub fn as_str(&self) -> &str {
        match self {
            NodeCategory::Llm => "LLM",
            NodeCategory::Data => "Data",
            NodeCategory::Services => "Services",
            NodeCategory::Utility => "Utility",
            NodeCategory::Other(name) => name,
        }
    }
}

impl From<String> for NodeCategory {
    fn from(value: String) -> Self {
        NodeCategory::from(value.as_str())
    }
}

impl From<&str> for NodeCategory {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "llm" => NodeCategory::Llm,
            "data" => NodeCategory::Data,
            "services" => NodeCategory::Services,
            "utility" => NodeCategory::Utility,
            _ => NodeCategory::Other(trimmed.to_string()),
        }
    }
}

impl From<NodeCategory> for String {
    fn from(category: NodeCategory) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a node plays in a run, derived from its type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Emits the caller's trigger input
    Trigger,
    /// Emits its joined inputs and sets the run's final output
    Response,
    /// Dispatched by category
    Step,
}

impl NodeRole {
    pub fn of(node_type: &str) -> Self {
        match node_type.trim().to_lowercase().as_str() {
            "trigger" | "input-trigger" => NodeRole::Trigger,
            "response" | "output-response" => NodeRole::Response,
            _ => NodeRole::Step,
        }
    }
}
