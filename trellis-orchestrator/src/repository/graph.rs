//! Graph Repository
//!
//! Loads the nodes and edges of one version as a detached graph snapshot.

use trellis_core::domain::graph::{Graph, GraphEdge, GraphNode};
use uuid::Uuid;

use crate::repository::{StoreResult, UnitOfWork};

/// Load the graph of a version, nodes and edges in insertion order
pub async fn load_graph(uow: &mut dyn UnitOfWork, version_id: Uuid) -> StoreResult<Graph> {
    let nodes = uow.list_nodes(version_id).await?;
    let edges = uow.list_edges(version_id).await?;

    Ok(Graph::new(
        nodes.into_iter().map(GraphNode::from).collect(),
        edges.into_iter().map(GraphEdge::from).collect(),
    ))
}
