//! Node handlers
//!
//! One handler per node category. The engine looks handlers up in a
//! [`HandlerRegistry`]; categories without a registered handler run the
//! passthrough fallback.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use trellis_core::domain::graph::GraphNode;
use trellis_core::domain::node::{NodeCategory, NodeStatus};

use crate::llm::{CompletionClient, CompletionRequest, ToolDefinition};

/// Longest input excerpt quoted in a node's output
const EXCERPT_LIMIT: usize = 64;

/// Status and output of one dispatched node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOutcome {
    pub status: NodeStatus,
    pub output: String,
}

impl NodeOutcome {
    pub fn completed(output: impl Into<String>) -> Self {
        Self {
            status: NodeStatus::Completed,
            output: output.into(),
        }
    }
}

/// Values shared by every node of one run
pub struct RunContext<'a> {
    /// Callable nodes of the graph, offered to LLM nodes
    pub tools: &'a [ToolDefinition],
    /// Deadline for each call to the completion backend
    pub deadline: Duration,
}

/// Executes nodes of one category
#[async_trait]
pub trait NodeHandler: Send + Sync {
    /// Produces the node's output from its predecessors' outputs.
    ///
    /// `inputs` are in edge declaration order. Handler failures are reported
    /// through the outcome status, never as an error.
    async fn run(&self, node: &GraphNode, inputs: &[String], ctx: &RunContext<'_>) -> NodeOutcome;
}

/// Maps node categories to their handlers
pub struct HandlerRegistry {
    handlers: HashMap<NodeCategory, Arc<dyn NodeHandler>>,
    fallback: Arc<dyn NodeHandler>,
}

impl HandlerRegistry {
    /// Creates a registry where every category runs `fallback`
    pub fn new(fallback: Arc<dyn NodeHandler>) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    /// The registry used in production: LLM, data, services and utility
    /// handlers with the passthrough fallback
    pub fn standard(completion: Option<Arc<dyn CompletionClient>>, default_model: String) -> Self {
        let mut registry = Self::new(Arc::new(PassthroughHandler));
        registry.register(
            NodeCategory::Llm,
            Arc::new(LlmHandler::new(completion, default_model)),
        );
        registry.register(NodeCategory::Data, Arc::new(DataHandler));
        registry.register(NodeCategory::Services, Arc::new(ServicesHandler));
        registry.register(NodeCategory::Utility, Arc::new(UtilityHandler));
        registry
    }

    /// Registers a handler, replacing any previous one for the category
    pub fn register(&mut self, category: NodeCategory, handler: Arc<dyn NodeHandler>) {
        self.handlers.insert(category, handler);
    }

    /// The handler for a category, or the fallback
    pub fn resolve(&self, category: &NodeCategory) -> &dyn NodeHandler {
        self.handlers
            .get(category)
            .unwrap_or(&self.fallback)
            .as_ref()
    }
}

// =============================================================================
// Category Handlers
// =============================================================================

/// Completes the joined inputs through the completion backend, or simulates
/// an answer when no backend is configured
pub struct LlmHandler {
    completion: Option<Arc<dyn CompletionClient>>,
    default_model: String,
}

impl LlmHandler {
    pub fn new(completion: Option<Arc<dyn CompletionClient>>, default_model: String) -> Self {
        Self {
            completion,
            default_model,
        }
    }
}

#[async_trait]
impl NodeHandler for LlmHandler {
    async fn run(&self, node: &GraphNode, inputs: &[String], ctx: &RunContext<'_>) -> NodeOutcome {
        let joined = inputs.join("\n");

        let Some(client) = &self.completion else {
            return NodeOutcome::completed(format!(
                "LLM[simulated] response for: {}",
                truncate(&joined, EXCERPT_LIMIT)
            ));
        };

        let model = config_value(&node.config, "model", &self.default_model);
        let prompt = if joined.is_empty() {
            "Hello".to_string()
        } else {
            joined
        };

        let request = CompletionRequest {
            model: model.clone(),
            prompt,
            temperature: config_number(&node.config, "temperature"),
            tools: ctx.tools.to_vec(),
            deadline: ctx.deadline,
        };

        match client.complete(request).await {
            Ok(text) => NodeOutcome::completed(text),
            Err(e) => {
                tracing::warn!("Completion failed for node {}: {}", node.id, e);
                NodeOutcome {
                    status: NodeStatus::Error,
                    output: format!("LLM[{}] error: {}", model, e),
                }
            }
        }
    }
}

/// Describes the retrieval its configuration points at
pub struct DataHandler;

#[async_trait]
impl NodeHandler for DataHandler {
    async fn run(&self, node: &GraphNode, _inputs: &[String], _ctx: &RunContext<'_>) -> NodeOutcome {
        let source = config_value(&node.config, "backend", "data-source");
        let collection = config_value(&node.config, "namespace", "default");
        NodeOutcome::completed(format!(
            "Data[{}] retrieved context from {}",
            source, collection
        ))
    }
}

/// Evaluates a metric over its inputs
pub struct ServicesHandler;

#[async_trait]
impl NodeHandler for ServicesHandler {
    async fn run(&self, node: &GraphNode, inputs: &[String], _ctx: &RunContext<'_>) -> NodeOutcome {
        let service = config_value(&node.config, "service", &node.node_type);
        let metric = config_value(&node.config, "metric", "quality");
        NodeOutcome::completed(format!(
            "Service[{}] evaluated metric '{}' => {}",
            service,
            metric,
            aggregate(inputs)
        ))
    }
}

/// Records how many signals reached it
pub struct UtilityHandler;

#[async_trait]
impl NodeHandler for UtilityHandler {
    async fn run(&self, node: &GraphNode, inputs: &[String], _ctx: &RunContext<'_>) -> NodeOutcome {
        let sink = config_value(&node.config, "sink", "monitor");
        NodeOutcome::completed(format!(
            "Utility[{}] recorded {} signals",
            sink,
            inputs.len()
        ))
    }
}

/// Echoes its inputs and leaves the node idle
pub struct PassthroughHandler;

#[async_trait]
impl NodeHandler for PassthroughHandler {
    async fn run(&self, node: &GraphNode, inputs: &[String], _ctx: &RunContext<'_>) -> NodeOutcome {
        let mut joined = inputs.join("\n");
        if joined.is_empty() {
            joined = "noop".to_string();
        }

        NodeOutcome {
            status: NodeStatus::Idle,
            output: format!(
                "{} passthrough: {}",
                node.category.as_str().to_uppercase(),
                truncate(&joined, EXCERPT_LIMIT)
            ),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// A non-empty string value from a node config, matching the key case-insensitively
pub fn config_value(config: &serde_json::Value, key: &str, fallback: &str) -> String {
    config
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(k, _)| k.eq_ignore_ascii_case(key))
        .find_map(|(_, v)| v.as_str().filter(|s| !s.is_empty()))
        .unwrap_or(fallback)
        .to_string()
}

fn config_number(config: &serde_json::Value, key: &str) -> Option<f64> {
    config
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, v)| v.as_f64())
}

/// Cuts `input` to `limit` characters, marking the cut with `...`
pub fn truncate(input: &str, limit: usize) -> String {
    match input.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &input[..end]),
        None => input.to_string(),
    }
}

fn aggregate(inputs: &[String]) -> String {
    match inputs {
        [] => "no-input".to_string(),
        [single] => truncate(single, EXCERPT_LIMIT),
        many => format!("aggregated-{}-signals", many.len()),
    }
}
