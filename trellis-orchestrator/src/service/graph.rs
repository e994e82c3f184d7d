//! Graph Service
//!
//! Resolves the graph of a pipeline for a given environment mode and edits
//! the nodes and edges of its current draft. Every edit runs in one unit of
//! work that locks the pipeline and fetches the draft fresh.

use serde_json::json;
use trellis_core::domain::edge::Edge;
use trellis_core::domain::graph::{EnvironmentMode, Graph};
use trellis_core::domain::node::{Node, NodeCategory, NodeStatus};
use trellis_core::domain::pipeline::Pipeline;
use trellis_core::domain::version::VersionState;
use trellis_core::dto::edge::CreateEdge;
use trellis_core::dto::node::{CreateNode, UpdateNode};
use trellis_core::dto::pipeline::PipelineRef;
use trellis_core::graph::{fixture_graph, key, merge};
use uuid::Uuid;

use crate::repository::graph_repository::load_graph;
use crate::repository::{GraphStore, UnitOfWork};
use crate::service::pipeline::{load_pipeline, lock_pipeline};
use crate::service::version::ensure_draft_in;
use crate::service::{GraphError, Result};

/// Get the graph of a pipeline as shown on the canvas.
///
/// Empty results are overlaid with the fixture graph unless the mode prefers
/// published content. Nodes and edges come back in display order.
pub async fn get_graph(
    store: &dyn GraphStore,
    target: PipelineRef,
    mode: EnvironmentMode,
) -> Result<Graph> {
    let mut uow = store.begin().await?;
    let pipeline = load_pipeline(uow.as_mut(), target).await?;
    let mut graph = resolve_graph(uow.as_mut(), &pipeline, mode).await?;

    if graph.is_empty() && mode.shows_fixture() {
        graph = with_fixture(&graph, &pipeline);
    }
    graph.sort_for_display();

    tracing::debug!(
        "Graph resolved for pipeline {} in {:?} mode: {} nodes, {} edges",
        pipeline.id,
        mode,
        graph.nodes.len(),
        graph.edges.len()
    );

    Ok(graph)
}

/// Resolve the graph of a pipeline for a mode, without any fixture overlay
pub(crate) async fn resolve_graph(
    uow: &mut dyn UnitOfWork,
    pipeline: &Pipeline,
    mode: EnvironmentMode,
) -> Result<Graph> {
    let draft = uow
        .find_version_by_state(pipeline.id, VersionState::Draft)
        .await?;
    let published = match pipeline.last_published_version_id {
        Some(version_id) => uow.find_version(version_id).await?,
        None => None,
    };

    let draft_graph = match &draft {
        Some(version) => Some(load_graph(uow, version.id).await?),
        None => None,
    };

    match mode {
        EnvironmentMode::DraftPreview => Ok(draft_graph.unwrap_or_default()),
        EnvironmentMode::PublishedPreferred => match (published, draft_graph) {
            (Some(version), _) => Ok(load_graph(uow, version.id).await?),
            (None, Some(graph)) => Ok(graph),
            (None, None) => Err(GraphError::NotFound(format!(
                "Pipeline {} has no versions",
                pipeline.id
            ))),
        },
        EnvironmentMode::Blended => {
            let published_graph = match published {
                Some(version) => load_graph(uow, version.id).await?,
                None => Graph::default(),
            };
            let mut graph = merge(&draft_graph.unwrap_or_default(), &published_graph);
            graph.drop_dangling_edges();
            Ok(graph)
        }
    }
}

/// Overlays the pipeline's fixture graph
pub(crate) fn with_fixture(graph: &Graph, pipeline: &Pipeline) -> Graph {
    merge(graph, &fixture_graph(&pipeline.id.to_string()))
}

// =============================================================================
// Nodes
// =============================================================================

/// Add a node to the current draft
pub async fn create_node(store: &dyn GraphStore, target: PipelineRef, req: CreateNode) -> Result<Node> {
    let label = non_empty(&req.label)
        .or_else(|| non_empty(&req.node_type))
        .ok_or_else(|| GraphError::Validation("Node label or type is required".to_string()))?
        .to_string();
    let category = NodeCategory::from(non_empty(&req.category).unwrap_or("Utility"));
    let node_type = match non_empty(&req.node_type) {
        Some(t) => t.to_string(),
        None => category.as_str().to_lowercase(),
    };
    check_length("Node label", &label, MAX_LABEL_LEN)?;
    check_length("Node category", category.as_str(), MAX_KIND_LEN)?;
    check_length("Node type", &node_type, MAX_KIND_LEN)?;
    let status = parse_status(&req.status)?.unwrap_or_default();
    let config = parse_config(&req.config_json)?;

    let mut uow = store.begin().await?;
    let pipeline = lock_pipeline(uow.as_mut(), target).await?;
    let draft = ensure_draft_in(uow.as_mut(), pipeline.id).await?;
    let key = unique_key(uow.as_mut(), draft.id, &label, None).await?;

    let node = Node {
        id: Uuid::new_v4(),
        version_id: draft.id,
        key,
        label,
        category,
        node_type,
        status,
        position: req.position,
        config,
        created_at: chrono::Utc::now(),
    };
    uow.insert_node(&node).await?;

    let stored = reread_node(uow.as_mut(), draft.id, node.id).await?;
    uow.commit().await?;

    tracing::info!(
        "Node created: {} ({}) in draft {} of pipeline {}",
        stored.key,
        stored.id,
        draft.number,
        pipeline.id
    );

    Ok(stored)
}

/// Change a node of the current draft.
///
/// Empty fields keep their stored value; the position is always replaced.
/// A new label regenerates the node key.
pub async fn update_node(
    store: &dyn GraphStore,
    target: PipelineRef,
    node_id: &str,
    req: UpdateNode,
) -> Result<Node> {
    let id = parse_id("node", node_id)?;
    check_length("Node label", req.label.trim(), MAX_LABEL_LEN)?;
    check_length("Node category", req.category.trim(), MAX_KIND_LEN)?;
    check_length("Node type", req.node_type.trim(), MAX_KIND_LEN)?;
    let status = parse_status(&req.status)?;
    let config = match non_empty(&req.config_json) {
        Some(raw) => Some(parse_config(raw)?),
        None => None,
    };

    let mut uow = store.begin().await?;
    let pipeline = lock_pipeline(uow.as_mut(), target).await?;
    let draft = ensure_draft_in(uow.as_mut(), pipeline.id).await?;

    let mut node = uow
        .find_node(draft.id, id)
        .await?
        .ok_or_else(|| GraphError::NotFound(format!("Node not found: {}", id)))?;

    if let Some(label) = non_empty(&req.label) {
        if label != node.label {
            node.key = unique_key(uow.as_mut(), draft.id, label, Some(&node.key)).await?;
            node.label = label.to_string();
        }
    }
    if let Some(category) = non_empty(&req.category) {
        node.category = NodeCategory::from(category);
    }
    if let Some(node_type) = non_empty(&req.node_type) {
        node.node_type = node_type.to_string();
    }
    if let Some(status) = status {
        node.status = status;
    }
    if let Some(config) = config {
        node.config = config;
    }
    node.position = req.position;

    if !uow.update_node(&node).await? {
        return Err(GraphError::NotFound(format!("Node not found: {}", id)));
    }

    let stored = reread_node(uow.as_mut(), draft.id, id).await?;
    uow.commit().await?;

    tracing::info!("Node updated: {} ({})", stored.key, stored.id);

    Ok(stored)
}

/// Remove a node and every edge touching it from the current draft
pub async fn delete_node(store: &dyn GraphStore, target: PipelineRef, node_id: &str) -> Result<()> {
    let id = parse_id("node", node_id)?;

    let mut uow = store.begin().await?;
    let pipeline = lock_pipeline(uow.as_mut(), target).await?;
    let draft = ensure_draft_in(uow.as_mut(), pipeline.id).await?;

    let removed_edges = uow.delete_edges_touching(draft.id, id).await?;
    if !uow.delete_node(draft.id, id).await? {
        return Err(GraphError::NotFound(format!("Node not found: {}", id)));
    }
    uow.commit().await?;

    tracing::info!("Node deleted: {} (with {} edges)", id, removed_edges);

    Ok(())
}

// =============================================================================
// Edges
// =============================================================================

/// Connect two nodes of the current draft
pub async fn create_edge(store: &dyn GraphStore, target: PipelineRef, req: CreateEdge) -> Result<Edge> {
    let source = parse_id("source node", &req.source)?;
    let target_node = parse_id("target node", &req.target)?;
    if source == target_node {
        return Err(GraphError::Validation(
            "An edge cannot connect a node to itself".to_string(),
        ));
    }
    check_length("Edge label", req.label.trim(), MAX_LABEL_LEN)?;

    let mut uow = store.begin().await?;
    let pipeline = lock_pipeline(uow.as_mut(), target).await?;
    let draft = ensure_draft_in(uow.as_mut(), pipeline.id).await?;

    for endpoint in [source, target_node] {
        uow.find_node(draft.id, endpoint)
            .await?
            .ok_or_else(|| GraphError::NotFound(format!("Node not found: {}", endpoint)))?;
    }

    let edge = Edge {
        id: Uuid::new_v4(),
        version_id: draft.id,
        source,
        target: target_node,
        label: req.label.trim().to_string(),
        created_at: chrono::Utc::now(),
    };
    uow.insert_edge(&edge).await?;

    let stored = uow
        .list_edges(draft.id)
        .await?
        .into_iter()
        .find(|e| e.id == edge.id)
        .ok_or_else(|| GraphError::NotFound(format!("Edge not found: {}", edge.id)))?;
    uow.commit().await?;

    tracing::info!(
        "Edge created: {} ({} -> {}) in pipeline {}",
        stored.id,
        stored.source,
        stored.target,
        pipeline.id
    );

    Ok(stored)
}

/// Remove an edge from the current draft
pub async fn delete_edge(store: &dyn GraphStore, target: PipelineRef, edge_id: &str) -> Result<()> {
    let id = parse_id("edge", edge_id)?;

    let mut uow = store.begin().await?;
    let pipeline = lock_pipeline(uow.as_mut(), target).await?;
    let draft = ensure_draft_in(uow.as_mut(), pipeline.id).await?;

    if !uow.delete_edge(draft.id, id).await? {
        return Err(GraphError::NotFound(format!("Edge not found: {}", id)));
    }
    uow.commit().await?;

    tracing::info!("Edge deleted: {}", id);

    Ok(())
}

async fn reread_node(uow: &mut dyn UnitOfWork, version_id: Uuid, id: Uuid) -> Result<Node> {
    uow.find_node(version_id, id)
        .await?
        .ok_or_else(|| GraphError::NotFound(format!("Node not found: {}", id)))
}

/// First key derived from `label` that is free in the version. `current` is
/// the node's own key, which does not count as taken.
async fn unique_key(
    uow: &mut dyn UnitOfWork,
    version_id: Uuid,
    label: &str,
    current: Option<&str>,
) -> Result<String> {
    for candidate in key::candidate_keys(label) {
        check_length("Node key", &candidate, MAX_LABEL_LEN)?;
        if current == Some(candidate.as_str()) || !uow.node_key_exists(version_id, &candidate).await? {
            return Ok(candidate);
        }
    }

    Err(GraphError::Validation(format!(
        "No free key for label '{}'",
        label
    )))
}

// =============================================================================
// Validation
// =============================================================================

const MAX_LABEL_LEN: usize = 255;
const MAX_KIND_LEN: usize = 100;

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(GraphError::Validation(format!(
            "{} is too long (max {} characters)",
            field, max
        )));
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

fn parse_id(what: &str, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| GraphError::Validation(format!("Invalid {} id: '{}'", what, raw)))
}

fn parse_status(raw: &str) -> Result<Option<NodeStatus>> {
    match non_empty(raw) {
        Some(value) => value
            .parse::<NodeStatus>()
            .map(Some)
            .map_err(GraphError::Validation),
        None => Ok(None),
    }
}

/// Parses node configuration JSON; empty input stands for `{}`
fn parse_config(raw: &str) -> Result<serde_json::Value> {
    match non_empty(raw) {
        Some(text) => serde_json::from_str(text)
            .map_err(|e| GraphError::Validation(format!("Invalid config JSON: {}", e))),
        None => Ok(json!({})),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::seeded_pipeline;
    use crate::service::version::publish;
    use trellis_core::domain::node::Position;
    use trellis_core::dto::version::PublishVersion;

    fn labelled(label: &str) -> CreateNode {
        CreateNode {
            label: label.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_config() {
        assert_eq!(parse_config("").unwrap(), json!({}));
        assert_eq!(parse_config(" ").unwrap(), json!({}));
        assert_eq!(parse_config(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
        assert!(matches!(parse_config("{oops"), Err(GraphError::Validation(_))));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("").unwrap(), None);
        assert_eq!(parse_status("Running").unwrap(), Some(NodeStatus::Running));
        assert!(matches!(parse_status("paused"), Err(GraphError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_draft_shows_fixture() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);
        let suffix = format!("::{}", pipeline.id);

        for mode in [EnvironmentMode::DraftPreview, EnvironmentMode::Blended] {
            let graph = get_graph(&store, target, mode).await.unwrap();
            assert_eq!(graph.nodes.len(), 4);
            assert_eq!(graph.edges.len(), 3);
            assert!(graph.nodes.iter().all(|n| n.id.ends_with(&suffix)));
            assert!(graph.edges.iter().all(|e| e.id.ends_with(&suffix)));
        }
    }

    #[tokio::test]
    async fn test_published_preferred_never_shows_fixture() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);

        let graph = get_graph(&store, target, EnvironmentMode::PublishedPreferred)
            .await
            .unwrap();
        assert!(graph.is_empty());
    }

    #[tokio::test]
    async fn test_published_preferred_without_versions_is_not_found() {
        let store = crate::repository::InMemoryGraphStore::new();
        let project = crate::service::project::create_project(
            &store,
            trellis_core::dto::project::CreateProject {
                name: "Demo".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap();

        // A pipeline row without any version
        let pipeline = Pipeline {
            id: Uuid::new_v4(),
            project_id: project.id,
            name: "Bare".to_string(),
            description: String::new(),
            last_published_version_id: None,
            created_at: chrono::Utc::now(),
        };
        let mut uow = store.begin().await.unwrap();
        uow.insert_pipeline(&pipeline).await.unwrap();
        uow.commit().await.unwrap();

        let target = PipelineRef::new(pipeline.id);
        let result = get_graph(&store, target, EnvironmentMode::PublishedPreferred).await;
        assert!(matches!(result, Err(GraphError::NotFound(_))));

        let draft = get_graph(&store, target, EnvironmentMode::DraftPreview).await.unwrap();
        assert_eq!(draft.nodes.len(), 4);
    }

    #[tokio::test]
    async fn test_modes_after_publish() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);

        create_node(&store, target, labelled("Alpha")).await.unwrap();
        publish(&store, target, PublishVersion::default()).await.unwrap();

        // Draft edits: rename the forked Alpha and add Beta
        let draft_graph = get_graph(&store, target, EnvironmentMode::DraftPreview)
            .await
            .unwrap();
        let alpha = &draft_graph.nodes[0];
        update_node(
            &store,
            target,
            &alpha.id,
            UpdateNode {
                category: "Data".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create_node(&store, target, labelled("Beta")).await.unwrap();

        let published = get_graph(&store, target, EnvironmentMode::PublishedPreferred)
            .await
            .unwrap();
        assert_eq!(published.nodes.len(), 1);
        assert_eq!(published.nodes[0].category, NodeCategory::Utility);

        let blended = get_graph(&store, target, EnvironmentMode::Blended).await.unwrap();
        assert_eq!(blended.nodes.len(), 2);
        let alpha = blended.nodes.iter().find(|n| n.key == "alpha").unwrap();
        assert_eq!(alpha.category, NodeCategory::Data);
    }

    #[tokio::test]
    async fn test_graph_is_sorted_for_display() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);

        for label in ["Zeta", "Alpha", "Mu"] {
            create_node(&store, target, labelled(label)).await.unwrap();
        }

        let graph = get_graph(&store, target, EnvironmentMode::DraftPreview)
            .await
            .unwrap();
        let labels: Vec<&str> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Mu", "Zeta"]);
    }

    #[tokio::test]
    async fn test_create_node_defaults() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);

        let node = create_node(
            &store,
            target,
            CreateNode {
                node_type: "webhook".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(node.label, "webhook");
        assert_eq!(node.key, "webhook");
        assert_eq!(node.category, NodeCategory::Utility);
        assert_eq!(node.status, NodeStatus::Idle);
        assert_eq!(node.config, json!({}));

        let llm = create_node(
            &store,
            target,
            CreateNode {
                label: "Planner".to_string(),
                category: "llm".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(llm.category, NodeCategory::Llm);
        assert_eq!(llm.node_type, "llm");
    }

    #[tokio::test]
    async fn test_create_node_rejects_bad_input() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);

        let missing = create_node(&store, target, CreateNode::default()).await;
        assert!(matches!(missing, Err(GraphError::Validation(_))));

        let bad_config = create_node(
            &store,
            target,
            CreateNode {
                label: "x".to_string(),
                config_json: "not json".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad_config, Err(GraphError::Validation(_))));

        let bad_status = create_node(
            &store,
            target,
            CreateNode {
                label: "x".to_string(),
                status: "sleeping".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad_status, Err(GraphError::Validation(_))));
    }

    #[tokio::test]
    async fn test_oversized_fields_are_rejected() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);
        let long = "x".repeat(300);

        let long_label = create_node(&store, target, labelled(&long)).await;
        assert!(matches!(long_label, Err(GraphError::Validation(_))));

        let long_type = create_node(
            &store,
            target,
            CreateNode {
                label: "Tool".to_string(),
                node_type: "t".repeat(101),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(long_type, Err(GraphError::Validation(_))));

        // 255 characters still fit
        let widest = create_node(&store, target, labelled(&"w".repeat(255))).await.unwrap();
        let other = create_node(&store, target, labelled("Other")).await.unwrap();

        let renamed = update_node(
            &store,
            target,
            &widest.id.to_string(),
            UpdateNode {
                label: long.clone(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(renamed, Err(GraphError::Validation(_))));

        let long_edge = create_edge(
            &store,
            target,
            CreateEdge {
                source: widest.id.to_string(),
                target: other.id.to_string(),
                label: long,
            },
        )
        .await;
        assert!(matches!(long_edge, Err(GraphError::Validation(_))));

        let graph = get_graph(&store, target, EnvironmentMode::DraftPreview)
            .await
            .unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.edges.is_empty());
    }

    #[tokio::test]
    async fn test_keys_are_unique_within_draft() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);

        let first = create_node(&store, target, labelled("Web Search")).await.unwrap();
        let second = create_node(&store, target, labelled("Web Search")).await.unwrap();
        let third = create_node(&store, target, labelled("web_search")).await.unwrap();

        assert_eq!(first.key, "web-search");
        assert_eq!(second.key, "web-search-2");
        assert_eq!(third.key, "web-search-3");
    }

    #[tokio::test]
    async fn test_update_node() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);
        let node = create_node(
            &store,
            target,
            CreateNode {
                label: "Draft".to_string(),
                config_json: r#"{"sink": "audit"}"#.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // Same label keeps the key; empty fields keep their value
        let same = update_node(
            &store,
            target,
            &node.id.to_string(),
            UpdateNode {
                label: "Draft".to_string(),
                status: "running".to_string(),
                position: Position { x: 10.0, y: 20.0 },
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(same.key, "draft");
        assert_eq!(same.status, NodeStatus::Running);
        assert_eq!(same.position, Position { x: 10.0, y: 20.0 });
        assert_eq!(same.config, json!({"sink": "audit"}));

        let renamed = update_node(
            &store,
            target,
            &node.id.to_string(),
            UpdateNode {
                label: "Final Review".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.key, "final-review");
        assert_eq!(renamed.position, Position::default());
    }

    #[tokio::test]
    async fn test_update_unknown_node() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);

        let malformed = update_node(&store, target, "nope", UpdateNode::default()).await;
        assert!(matches!(malformed, Err(GraphError::Validation(_))));

        let missing = update_node(
            &store,
            target,
            &Uuid::new_v4().to_string(),
            UpdateNode::default(),
        )
        .await;
        assert!(matches!(missing, Err(GraphError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_edge_rules() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);
        let a = create_node(&store, target, labelled("A")).await.unwrap();

        let self_loop = create_edge(
            &store,
            target,
            CreateEdge {
                source: a.id.to_string(),
                target: a.id.to_string(),
                label: String::new(),
            },
        )
        .await;
        assert!(matches!(self_loop, Err(GraphError::Validation(_))));

        let dangling = create_edge(
            &store,
            target,
            CreateEdge {
                source: a.id.to_string(),
                target: Uuid::new_v4().to_string(),
                label: String::new(),
            },
        )
        .await;
        assert!(matches!(dangling, Err(GraphError::NotFound(_))));

        let malformed = create_edge(
            &store,
            target,
            CreateEdge {
                source: "a".to_string(),
                target: a.id.to_string(),
                label: String::new(),
            },
        )
        .await;
        assert!(matches!(malformed, Err(GraphError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_node_removes_its_edges() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);
        let a = create_node(&store, target, labelled("A")).await.unwrap();
        let b = create_node(&store, target, labelled("B")).await.unwrap();
        let c = create_node(&store, target, labelled("C")).await.unwrap();

        let ab = create_edge(
            &store,
            target,
            CreateEdge {
                source: a.id.to_string(),
                target: b.id.to_string(),
                label: " flows ".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(ab.label, "flows");

        create_edge(
            &store,
            target,
            CreateEdge {
                source: b.id.to_string(),
                target: c.id.to_string(),
                label: String::new(),
            },
        )
        .await
        .unwrap();

        delete_node(&store, target, &b.id.to_string()).await.unwrap();

        let graph = get_graph(&store, target, EnvironmentMode::DraftPreview)
            .await
            .unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.edges.is_empty());

        let again = delete_node(&store, target, &b.id.to_string()).await;
        assert!(matches!(again, Err(GraphError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_edge() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);
        let a = create_node(&store, target, labelled("A")).await.unwrap();
        let b = create_node(&store, target, labelled("B")).await.unwrap();
        let edge = create_edge(
            &store,
            target,
            CreateEdge {
                source: a.id.to_string(),
                target: b.id.to_string(),
                label: String::new(),
            },
        )
        .await
        .unwrap();

        delete_edge(&store, target, &edge.id.to_string()).await.unwrap();
        let again = delete_edge(&store, target, &edge.id.to_string()).await;
        assert!(matches!(again, Err(GraphError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_deleted_draft_edge_stays_deleted_when_blended() {
        let (store, pipeline) = seeded_pipeline().await;
        let target = PipelineRef::new(pipeline.id);
        let a = create_node(&store, target, labelled("A")).await.unwrap();
        let b = create_node(&store, target, labelled("B")).await.unwrap();
        create_edge(
            &store,
            target,
            CreateEdge {
                source: a.id.to_string(),
                target: b.id.to_string(),
                label: String::new(),
            },
        )
        .await
        .unwrap();
        publish(&store, target, PublishVersion::default()).await.unwrap();

        let draft = get_graph(&store, target, EnvironmentMode::DraftPreview)
            .await
            .unwrap();
        delete_edge(&store, target, &draft.edges[0].id).await.unwrap();

        let draft = get_graph(&store, target, EnvironmentMode::DraftPreview)
            .await
            .unwrap();
        assert!(draft.edges.is_empty());

        let blended = get_graph(&store, target, EnvironmentMode::Blended).await.unwrap();
        let draft_ids: Vec<&str> = draft.nodes.iter().map(|n| n.id.as_str()).collect();
        let blended_ids: Vec<&str> = blended.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(blended_ids, draft_ids);
        assert!(blended.edges.is_empty());
    }
}
