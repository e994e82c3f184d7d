//! Execution Engine
//!
//! Runs a resolved graph once, node by node in schedule order. Each node sees
//! the outputs of its predecessors, in the order the edges were declared.
//! Trigger nodes emit the caller's input, response nodes emit their joined
//! inputs and set the run's final output, and every other node is dispatched
//! to the handler registered for its category.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use trellis_core::domain::execution::{ExecutionReport, NodeExecutionResult};
use trellis_core::domain::graph::{Graph, GraphEdge, GraphNode};
use trellis_core::domain::node::NodeRole;
use trellis_core::graph::topological_order;

use crate::llm::{CompletionClient, ToolDefinition};

pub use handlers::{HandlerRegistry, NodeHandler, NodeOutcome, RunContext};

/// Trigger output when the caller supplies no input
pub const DEFAULT_TRIGGER_INPUT: &str = "Default trigger input";

pub struct ExecutionEngine {
    registry: HandlerRegistry,
    default_deadline: Duration,
}

impl ExecutionEngine {
    pub fn new(registry: HandlerRegistry, default_deadline: Duration) -> Self {
        Self {
            registry,
            default_deadline,
        }
    }

    /// Engine with the standard handlers; LLM nodes are simulated when
    /// `completion` is `None`
    pub fn standard(
        completion: Option<Arc<dyn CompletionClient>>,
        default_model: String,
        default_deadline: Duration,
    ) -> Self {
        Self::new(
            HandlerRegistry::standard(completion, default_model),
            default_deadline,
        )
    }

    /// Runs every node of `graph` once, sequentially.
    ///
    /// `deadline` bounds each completion call and defaults to the engine's.
    pub async fn execute(
        &self,
        graph: &Graph,
        trigger_input: &str,
        deadline: Option<Duration>,
    ) -> ExecutionReport {
        let schedule = topological_order(&graph.nodes, &graph.edges);
        if !schedule.is_complete() {
            tracing::warn!(
                "Graph contains a cycle, running {} nodes in id order: {:?}",
                schedule.unresolved().len(),
                schedule.unresolved()
            );
        }

        let inbound = inbound_index(&graph.edges);
        let lookup: HashMap<&str, &GraphNode> =
            graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let trigger_input = if trigger_input.is_empty() {
            DEFAULT_TRIGGER_INPUT
        } else {
            trigger_input
        };

        let tools = collect_tools(&graph.nodes);
        let ctx = RunContext {
            tools: &tools,
            deadline: deadline.unwrap_or(self.default_deadline),
        };

        let mut outputs: HashMap<&str, String> = HashMap::with_capacity(graph.nodes.len());
        let mut results = Vec::with_capacity(graph.nodes.len());
        let mut final_output = String::new();

        for node_id in schedule.order() {
            let Some(node) = lookup.get(node_id.as_str()).copied() else {
                continue;
            };

            let outcome = match NodeRole::of(&node.node_type) {
                NodeRole::Trigger => NodeOutcome::completed(trigger_input),
                role => {
                    let inputs: Vec<String> = inbound
                        .get(node.id.as_str())
                        .into_iter()
                        .flatten()
                        .filter_map(|source| outputs.get(source).cloned())
                        .collect();

                    if role == NodeRole::Response {
                        let outcome = NodeOutcome::completed(inputs.join("\n"));
                        final_output = outcome.output.clone();
                        outcome
                    } else {
                        self.registry
                            .resolve(&node.category)
                            .run(node, &inputs, &ctx)
                            .await
                    }
                }
            };

            tracing::debug!(
                "Node {} ({}) finished with status {}",
                node.id,
                node.category,
                outcome.status
            );

            outputs.insert(node.id.as_str(), outcome.output.clone());
            results.push(NodeExecutionResult {
                node_id: node.id.clone(),
                status: outcome.status,
                output: outcome.output,
            });
        }

        ExecutionReport {
            results,
            final_output,
            unresolved_cycle: schedule.unresolved().to_vec(),
        }
    }
}

/// Sources of the edges into each node, in edge declaration order
pub fn inbound_index(edges: &[GraphEdge]) -> HashMap<&str, Vec<&str>> {
    let mut inbound: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        inbound
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }
    inbound
}

/// Tool descriptors for every callable node
pub fn collect_tools(nodes: &[GraphNode]) -> Vec<ToolDefinition> {
    nodes
        .iter()
        .filter(|n| n.is_callable())
        .map(|n| {
            let name = if n.key.is_empty() { &n.id } else { &n.key };
            ToolDefinition::function(name.clone(), format!("{} - {}", n.label, n.node_type))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionError, CompletionRequest};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use trellis_core::domain::node::{NodeCategory, NodeStatus, Position};
    use trellis_core::graph::fixture_graph;

    /// Completion backend that replays a canned answer and records requests
    struct ScriptedCompletion {
        reply: Result<String, u16>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedCompletion {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedCompletion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(CompletionError::ApiError {
                    status: *status,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    fn node(id: &str, category: NodeCategory, node_type: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            key: id.to_string(),
            label: id.to_uppercase(),
            category,
            node_type: node_type.to_string(),
            status: NodeStatus::Idle,
            position: Position::default(),
            config: json!({}),
        }
    }

    fn edge(source: &str, target: &str) -> GraphEdge {
        GraphEdge {
            id: format!("{}->{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            label: String::new(),
        }
    }

    fn simulated() -> ExecutionEngine {
        ExecutionEngine::standard(None, "test-model".to_string(), Duration::from_secs(5))
    }

    fn result<'a>(report: &'a ExecutionReport, id: &str) -> &'a NodeExecutionResult {
        report.results.iter().find(|r| r.node_id == id).unwrap()
    }

    #[tokio::test]
    async fn test_trigger_to_response_chain() {
        let graph = Graph::new(
            vec![
                node("a", NodeCategory::Utility, "trigger"),
                node("b", NodeCategory::Llm, "llm"),
                node("c", NodeCategory::Utility, "response"),
            ],
            vec![edge("a", "b"), edge("b", "c")],
        );

        let report = simulated().execute(&graph, "hello", None).await;

        let a = result(&report, "a");
        assert_eq!(a.status, NodeStatus::Completed);
        assert_eq!(a.output, "hello");

        assert_eq!(result(&report, "b").output, "LLM[simulated] response for: hello");

        let c = result(&report, "c");
        assert_eq!(c.output, "LLM[simulated] response for: hello");
        assert_eq!(report.final_output, c.output);
        assert!(report.unresolved_cycle.is_empty());
    }

    #[tokio::test]
    async fn test_empty_trigger_uses_default() {
        let graph = Graph::new(vec![node("t", NodeCategory::Utility, "input-trigger")], vec![]);
        let report = simulated().execute(&graph, "", None).await;
        assert_eq!(report.results[0].output, DEFAULT_TRIGGER_INPUT);
        assert_eq!(report.final_output, "");
    }

    #[tokio::test]
    async fn test_inputs_follow_edge_declaration_order() {
        // "z" is scheduled after "a", but its edge is declared first
        let graph = Graph::new(
            vec![
                node("a", NodeCategory::Utility, "trigger"),
                node("z", NodeCategory::Data, "data"),
                node("out", NodeCategory::Utility, "output-response"),
            ],
            vec![edge("z", "out"), edge("a", "out")],
        );

        let report = simulated().execute(&graph, "ping", None).await;
        assert_eq!(
            report.final_output,
            "Data[data-source] retrieved context from default\nping"
        );
    }

    #[tokio::test]
    async fn test_last_response_wins() {
        let graph = Graph::new(
            vec![
                node("t", NodeCategory::Utility, "trigger"),
                node("r1", NodeCategory::Utility, "response"),
                node("r2", NodeCategory::Utility, "response"),
                node("u", NodeCategory::Utility, "monitor"),
            ],
            vec![edge("t", "r1"), edge("t", "u"), edge("u", "r2")],
        );

        let report = simulated().execute(&graph, "x", None).await;
        assert_eq!(report.final_output, "Utility[monitor] recorded 1 signals");
    }

    #[tokio::test]
    async fn test_unknown_category_passes_through() {
        let graph = Graph::new(
            vec![
                node("t", NodeCategory::Utility, "trigger"),
                node("v", NodeCategory::from("vision"), "camera"),
            ],
            vec![edge("t", "v")],
        );

        let report = simulated().execute(&graph, "frame", None).await;
        let v = result(&report, "v");
        assert_eq!(v.status, NodeStatus::Idle);
        assert_eq!(v.output, "VISION passthrough: frame");
    }

    #[tokio::test]
    async fn test_cycle_still_runs_every_node() {
        let graph = Graph::new(
            vec![
                node("a", NodeCategory::Utility, "monitor"),
                node("b", NodeCategory::Utility, "monitor"),
            ],
            vec![edge("a", "b"), edge("b", "a")],
        );

        let report = simulated().execute(&graph, "", None).await;
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.unresolved_cycle, vec!["a", "b"]);
        // "a" runs before "b" produced anything
        assert_eq!(result(&report, "a").output, "Utility[monitor] recorded 0 signals");
        assert_eq!(result(&report, "b").output, "Utility[monitor] recorded 1 signals");
    }

    #[tokio::test]
    async fn test_fixture_graph_runs() {
        let report = simulated().execute(&fixture_graph("p"), "", None).await;
        assert_eq!(report.results.len(), 4);
        assert_eq!(
            report.results[3].output,
            "Utility[trellis-analytics] recorded 1 signals"
        );
        assert!(!report.has_errors());
    }

    #[test]
    fn test_collect_tools() {
        let mut judge = node("judge", NodeCategory::Services, "judge");
        judge.label = "Judge".to_string();
        let search = node("search", NodeCategory::Utility, "web-tool");
        let plain = node("plain", NodeCategory::Utility, "monitor");

        let tools = collect_tools(&[judge, plain, search]);
        let names: Vec<&str> = tools.iter().map(|t| t.function.name.as_str()).collect();
        assert_eq!(names, vec!["judge", "search"]);
        assert_eq!(tools[0].function.description, "Judge - judge");
    }

    #[tokio::test]
    async fn test_llm_node_calls_completion_backend() {
        let backend = ScriptedCompletion::answering("forty-two");
        let engine = ExecutionEngine::standard(
            Some(backend.clone()),
            "default-model".to_string(),
            Duration::from_secs(60),
        );

        let mut llm = node("llm", NodeCategory::Llm, "llm");
        llm.config = json!({"Model": "custom-model", "temperature": 0.3});
        let graph = Graph::new(
            vec![
                node("t", NodeCategory::Utility, "trigger"),
                llm,
                node("svc", NodeCategory::Services, "judge"),
            ],
            vec![edge("t", "llm"), edge("llm", "svc")],
        );

        let report = engine
            .execute(&graph, "question", Some(Duration::from_millis(1500)))
            .await;
        assert_eq!(result(&report, "llm").output, "forty-two");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "custom-model");
        assert_eq!(requests[0].prompt, "question");
        assert_eq!(requests[0].temperature, Some(0.3));
        assert_eq!(requests[0].deadline, Duration::from_millis(1500));
        assert_eq!(requests[0].tools.len(), 1);
        assert_eq!(requests[0].tools[0].function.name, "svc");
    }

    #[tokio::test]
    async fn test_llm_without_inputs_prompts_hello() {
        let backend = ScriptedCompletion::answering("hi");
        let engine = ExecutionEngine::standard(
            Some(backend.clone()),
            "default-model".to_string(),
            Duration::from_secs(60),
        );

        let graph = Graph::new(vec![node("llm", NodeCategory::Llm, "llm")], vec![]);
        engine.execute(&graph, "", None).await;

        let requests = backend.requests();
        assert_eq!(requests[0].prompt, "Hello");
        assert_eq!(requests[0].model, "default-model");
        assert_eq!(requests[0].deadline, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_llm_failure_marks_node_as_error() {
        let engine = ExecutionEngine::standard(
            Some(ScriptedCompletion::failing(503)),
            "default-model".to_string(),
            Duration::from_secs(60),
        );

        let graph = Graph::new(vec![node("llm", NodeCategory::Llm, "llm")], vec![]);
        let report = engine.execute(&graph, "", None).await;

        let llm = result(&report, "llm");
        assert_eq!(llm.status, NodeStatus::Error);
        assert!(llm.output.starts_with("LLM[default-model] error: API error (status 503)"));
        assert!(report.has_errors());
    }
}
