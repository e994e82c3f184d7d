//! Execution result types

use serde::{Deserialize, Serialize};

use crate::domain::node::NodeStatus;

/// Outcome of running a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeExecutionResult {
    pub node_id: String,
    pub status: NodeStatus,
    pub output: String,
}

/// Outcome of running a whole graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Per-node results in execution order
    pub results: Vec<NodeExecutionResult>,
    /// Output of the last response node that ran, empty if none did
    pub final_output: String,
    /// Nodes the scheduler could not order because of a cycle
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_cycle: Vec<String>,
}

impl ExecutionReport {
    /// Whether any node ended in the error state
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.status == NodeStatus::Error)
    }
}
