//! Execution ordering
//!
//! Kahn's algorithm with a sorted ready set: among all nodes whose
//! predecessors have run, the lexicographically smallest id goes next. The
//! result depends only on the node and edge sets, never on input order.
//!
//! Cycles do not fail scheduling. Nodes that never become ready are appended,
//! sorted by id, and reported through [`Schedule::CompletedWithUnresolvedCycle`].

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::graph::{GraphEdge, GraphNode};

/// Result of ordering a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Every node was ordered after all of its predecessors
    Complete(Vec<String>),
    /// Some nodes sit on (or behind) a cycle. `order` still lists every node
    /// exactly once, with `nodes` appended at the tail in id order.
    CompletedWithUnresolvedCycle {
        order: Vec<String>,
        nodes: Vec<String>,
    },
}

impl Schedule {
    /// Every node id, in execution order
    pub fn order(&self) -> &[String] {
        match self {
            Schedule::Complete(order) => order,
            Schedule::CompletedWithUnresolvedCycle { order, .. } => order,
        }
    }

    /// Nodes whose dependencies could not be honoured
    pub fn unresolved(&self) -> &[String] {
        match self {
            Schedule::Complete(_) => &[],
            Schedule::CompletedWithUnresolvedCycle { nodes, .. } => nodes,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Schedule::Complete(_))
    }
}

/// Computes the execution order of `nodes`.
///
/// Only edges whose target is one of `nodes` count towards in-degree.
pub fn topological_order(nodes: &[GraphNode], edges: &[GraphEdge]) -> Schedule {
    let mut in_degree: HashMap<&str, usize> = nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();

    for edge in edges {
        if let Some(degree) = in_degree.get_mut(edge.target.as_str()) {
            *degree += 1;
        }
        successors
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut order: Vec<String> = Vec::with_capacity(in_degree.len());

    while let Some(id) = ready.pop_first() {
        order.push(id.to_string());

        for child in successors.get(id).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(child) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(*child);
                }
            }
        }
    }

    if order.len() == in_degree.len() {
        return Schedule::Complete(order);
    }

    let scheduled: HashSet<&str> = order.iter().map(String::as_str).collect();
    let mut remaining: Vec<String> = in_degree
        .keys()
        .filter(|id| !scheduled.contains(*id))
        .map(|id| id.to_string())
        .collect();
    remaining.sort();

    order.extend(remaining.iter().cloned());

    Schedule::CompletedWithUnresolvedCycle {
        order,
        nodes: remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::{NodeCategory, NodeStatus, Position};

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter()
            .map(|id| GraphNode {
                id: id.to_string(),
                key: id.to_string(),
                label: id.to_uppercase(),
                category: NodeCategory::Utility,
                node_type: "utility".to_string(),
                status: NodeStatus::Idle,
                position: Position::default(),
                config: serde_json::json!({}),
            })
            .collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<GraphEdge> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (s, t))| GraphEdge {
                id: format!("e{}", i),
                source: s.to_string(),
                target: t.to_string(),
                label: String::new(),
            })
            .collect()
    }

    fn position(order: &[String], id: &str) -> usize {
        order.iter().position(|x| x == id).unwrap()
    }

    #[test]
    fn test_linear_chain() {
        let schedule = topological_order(&nodes(&["c", "b", "a"]), &edges(&[("a", "b"), ("b", "c")]));
        assert_eq!(schedule, Schedule::Complete(vec!["a".into(), "b".into(), "c".into()]));
    }

    #[test]
    fn test_ties_break_by_smallest_id() {
        // z is ready from the start, but x becomes ready first and sorts ahead of it
        let schedule = topological_order(
            &nodes(&["a", "x", "b", "z"]),
            &edges(&[("a", "x"), ("a", "b"), ("z", "b")]),
        );
        assert_eq!(schedule.order(), &["a", "x", "z", "b"]);
    }

    #[test]
    fn test_every_edge_respected_in_dag() {
        let ns = nodes(&["n1", "n2", "n3", "n4", "n5", "n6"]);
        let es = edges(&[
            ("n6", "n1"),
            ("n1", "n2"),
            ("n1", "n3"),
            ("n3", "n2"),
            ("n5", "n4"),
            ("n2", "n4"),
        ]);
        let schedule = topological_order(&ns, &es);
        assert!(schedule.is_complete());

        let order = schedule.order();
        assert_eq!(order.len(), ns.len());
        for e in &es {
            assert!(position(order, &e.source) < position(order, &e.target));
        }
    }

    #[test]
    fn test_order_is_independent_of_input_order() {
        let es = edges(&[("a", "c"), ("b", "c")]);
        let mut reversed = es.clone();
        reversed.reverse();

        let first = topological_order(&nodes(&["a", "b", "c"]), &es);
        let second = topological_order(&nodes(&["c", "b", "a"]), &reversed);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cycle_is_appended_sorted() {
        let schedule = topological_order(
            &nodes(&["start", "y", "x", "end"]),
            &edges(&[("start", "x"), ("x", "y"), ("y", "x"), ("y", "end")]),
        );

        assert!(!schedule.is_complete());
        assert_eq!(schedule.unresolved(), &["end", "x", "y"]);
        assert_eq!(schedule.order(), &["start", "end", "x", "y"]);
    }

    #[test]
    fn test_cycle_lists_every_node_once() {
        let ns = nodes(&["a", "b", "c"]);
        let schedule = topological_order(&ns, &edges(&[("a", "b"), ("b", "c"), ("c", "a")]));

        let mut listed = schedule.order().to_vec();
        listed.sort();
        listed.dedup();
        assert_eq!(listed.len(), ns.len());
        assert_eq!(schedule.order(), &["a", "b", "c"]);
    }

    #[test]
    fn test_edges_to_unknown_targets_are_ignored() {
        let schedule = topological_order(&nodes(&["a"]), &edges(&[("a", "ghost")]));
        assert_eq!(schedule, Schedule::Complete(vec!["a".into()]));
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(topological_order(&[], &[]), Schedule::Complete(vec![]));
    }
}
