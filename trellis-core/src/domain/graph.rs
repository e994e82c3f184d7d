//! Graph snapshot types
//!
//! A `Graph` is a detached, read-only view of one version's nodes and edges
//! (or of a merge of several). Identities are plain strings so that stored
//! graphs and the fixture graph share one representation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::edge::Edge;
use crate::domain::node::{Node, NodeCategory, NodeStatus, Position};

/// Node as seen in a graph snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub key: String,
    pub label: String,
    pub category: NodeCategory,
    #[serde(rename = "type")]
    pub node_type: String,
    pub status: NodeStatus,
    pub position: Position,
    pub config: serde_json::Value,
}

impl GraphNode {
    /// Identity used when merging snapshots: the key if present, else the id
    pub fn merge_key(&self) -> &str {
        if self.key.is_empty() { &self.id } else { &self.key }
    }

    /// Whether this node is exposed to LLM nodes as a callable tool
    pub fn is_callable(&self) -> bool {
        self.node_type.to_lowercase().contains("tool") || self.category == NodeCategory::Services
    }
}

impl From<Node> for GraphNode {
    fn from(node: Node) -> Self {
        GraphNode {
            id: node.id.to_string(),
            key: node.key,
            label: node.label,
            category: node.category,
            node_type: node.node_type,
            status: node.status,
            position: node.position,
            config: node.config,
        }
    }
}

/// Edge as seen in a graph snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

impl GraphEdge {
    /// Identity used when merging snapshots
    pub fn merge_key(&self) -> (String, String, String) {
        (
            self.source.clone(),
            self.target.clone(),
            self.label.clone(),
        )
    }
}

impl From<Edge> for GraphEdge {
    fn from(edge: Edge) -> Self {
        GraphEdge {
            id: edge.id.to_string(),
            source: edge.source.to_string(),
            target: edge.target.to_string(),
            label: edge.label,
        }
    }
}

/// Nodes and edges of one resolved graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes edges with an endpoint outside the node set
    pub fn drop_dangling_edges(&mut self) {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .retain(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()));
    }

    /// Sorts nodes by (label, id) and edges by (source+target+label, id)
    pub fn sort_for_display(&mut self) {
        self.nodes
            .sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
        self.edges.sort_by(|a, b| {
            let left = format!("{}{}{}", a.source, a.target, a.label);
            let right = format!("{}{}{}", b.source, b.target, b.label);
            left.cmp(&right).then_with(|| a.id.cmp(&b.id))
        });
    }
}

/// Graph resolution policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// The draft only
    #[default]
    DraftPreview,
    /// The published version, falling back to the draft
    PublishedPreferred,
    /// The draft merged over the published version
    Blended,
}

impl EnvironmentMode {
    /// Whether an empty result in this mode is overlaid with the fixture graph
    pub fn shows_fixture(&self) -> bool {
        !matches!(self, EnvironmentMode::PublishedPreferred)
    }
}
