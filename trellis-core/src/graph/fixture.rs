//! Fixture graph
//!
//! A fixed four-node demo pipeline shown on the canvas of pipelines that have
//! no authored content yet. Identities are suffixed with `::<pipeline id>` so
//! fixtures of different pipelines never collide.

use serde_json::json;

use crate::domain::graph::{Graph, GraphEdge, GraphNode};
use crate::domain::node::{NodeCategory, NodeStatus, Position};

struct NodeTemplate {
    id: &'static str,
    key: &'static str,
    label: &'static str,
    category: NodeCategory,
    node_type: &'static str,
    status: NodeStatus,
    position: Position,
    config: serde_json::Value,
}

fn node_templates() -> Vec<NodeTemplate> {
    vec![
        NodeTemplate {
            id: "fixture-node-llm-core",
            key: "llm-core",
            label: "LLM Core",
            category: NodeCategory::Llm,
            node_type: "llm",
            status: NodeStatus::Running,
            position: Position { x: 120.0, y: 80.0 },
            config: json!({"model": "trellis-demo", "temperature": 0.2}),
        },
        NodeTemplate {
            id: "fixture-node-knowledge-base",
            key: "knowledge-base",
            label: "Knowledge Base",
            category: NodeCategory::Data,
            node_type: "data-retrieval",
            status: NodeStatus::Idle,
            position: Position { x: 420.0, y: 140.0 },
            config: json!({"backend": "qdrant", "namespace": "trellis"}),
        },
        NodeTemplate {
            id: "fixture-node-evaluator",
            key: "evaluator",
            label: "Evaluator",
            category: NodeCategory::Services,
            node_type: "judge",
            status: NodeStatus::Idle,
            position: Position { x: 720.0, y: 180.0 },
            config: json!({"metric": "quality", "threshold": 0.8}),
        },
        NodeTemplate {
            id: "fixture-node-monitoring",
            key: "monitoring",
            label: "Monitoring",
            category: NodeCategory::Utility,
            node_type: "monitor",
            status: NodeStatus::Idle,
            position: Position { x: 960.0, y: 220.0 },
            config: json!({"sink": "trellis-analytics"}),
        },
    ]
}

const EDGE_TEMPLATES: [(&str, &str, &str, &str); 3] = [
    (
        "fixture-edge-llm-to-kb",
        "fixture-node-llm-core",
        "fixture-node-knowledge-base",
        "context",
    ),
    (
        "fixture-edge-kb-to-evaluator",
        "fixture-node-knowledge-base",
        "fixture-node-evaluator",
        "responses",
    ),
    (
        "fixture-edge-evaluator-to-monitor",
        "fixture-node-evaluator",
        "fixture-node-monitoring",
        "insights",
    ),
];

/// Builds the fixture graph for one pipeline.
///
/// An empty suffix is replaced by `default`.
pub fn fixture_graph(suffix: &str) -> Graph {
    let suffix = if suffix.is_empty() { "default" } else { suffix };
    let scoped = |id: &str| format!("{}::{}", id, suffix);

    let nodes = node_templates()
        .into_iter()
        .map(|t| GraphNode {
            id: scoped(t.id),
            key: t.key.to_string(),
            label: t.label.to_string(),
            category: t.category,
            node_type: t.node_type.to_string(),
            status: t.status,
            position: t.position,
            config: t.config,
        })
        .collect();

    let edges = EDGE_TEMPLATES
        .iter()
        .map(|(id, source, target, label)| GraphEdge {
            id: scoped(id),
            source: scoped(source),
            target: scoped(target),
            label: label.to_string(),
        })
        .collect();

    Graph::new(nodes, edges)
}
