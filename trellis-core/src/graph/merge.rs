//! Graph merging
//!
//! Combines two snapshots into one. The primary graph always wins: nodes are
//! matched by key (or id when the key is empty) and edges by
//! `(source, target, label)`. Output order is the fallback's order followed by
//! primary-only entries, so merging is deterministic.

use std::collections::HashMap;

use crate::domain::graph::{Graph, GraphEdge, GraphNode};

/// Overlays `primary` on top of `fallback`.
///
/// Edges are merged as stored. An edge keeps its endpoints even when the node
/// it points at was replaced by a primary node with another id.
pub fn merge(primary: &Graph, fallback: &Graph) -> Graph {
    let mut nodes: Vec<GraphNode> = Vec::with_capacity(fallback.nodes.len() + primary.nodes.len());
    let mut node_slots: HashMap<String, usize> = HashMap::new();

    for node in fallback.nodes.iter().chain(primary.nodes.iter()) {
        match node_slots.get(node.merge_key()) {
            Some(&slot) => nodes[slot] = node.clone(),
            None => {
                node_slots.insert(node.merge_key().to_string(), nodes.len());
                nodes.push(node.clone());
            }
        }
    }

    let mut edges: Vec<GraphEdge> = Vec::with_capacity(fallback.edges.len() + primary.edges.len());
    let mut edge_slots: HashMap<(String, String, String), usize> = HashMap::new();

    for edge in fallback.edges.iter().chain(primary.edges.iter()) {
        let key = edge.merge_key();
        match edge_slots.get(&key) {
            Some(&slot) => edges[slot] = edge.clone(),
            None => {
                edge_slots.insert(key, edges.len());
                edges.push(edge.clone());
            }
        }
    }

    Graph::new(nodes, edges)
}
