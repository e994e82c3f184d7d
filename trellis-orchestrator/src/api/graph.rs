//! Graph API Handlers
//!
//! HTTP endpoints for reading a pipeline graph and editing its draft.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use trellis_core::domain::edge::Edge;
use trellis_core::domain::graph::Graph;
use trellis_core::domain::node::Node;
use trellis_core::dto::edge::CreateEdge;
use trellis_core::dto::graph::GraphQuery;
use trellis_core::dto::node::{CreateNode, UpdateNode};
use trellis_core::dto::pipeline::{PipelineRef, ProjectScope};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::graph_service;

/// GET /pipeline/{id}/graph
/// Get the graph of a pipeline
///
/// Query parameters:
/// - mode: draft_preview (default), published_preferred or blended
/// - project_id: optional, the project that must own the pipeline
pub async fn get_graph(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<GraphQuery>,
) -> ApiResult<Json<Graph>> {
    tracing::debug!("Getting graph of pipeline {} ({:?})", id, query.mode);

    let target = PipelineRef {
        pipeline_id: id,
        project_id: query.project_id,
    };
    let graph = graph_service::get_graph(state.store.as_ref(), target, query.mode).await?;

    Ok(Json(graph))
}

/// POST /pipeline/{id}/node
/// Add a node to the draft
pub async fn create_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<ProjectScope>,
    Json(req): Json<CreateNode>,
) -> ApiResult<Json<Node>> {
    tracing::info!("Creating node in pipeline: {}", id);

    let node = graph_service::create_node(state.store.as_ref(), scope.target(id), req).await?;

    Ok(Json(node))
}

/// PUT /pipeline/{id}/node/{node_id}
/// Update a node of the draft
pub async fn update_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(Uuid, String)>,
    Query(scope): Query<ProjectScope>,
    Json(req): Json<UpdateNode>,
) -> ApiResult<Json<Node>> {
    tracing::info!("Updating node {} in pipeline: {}", node_id, id);

    let node =
        graph_service::update_node(state.store.as_ref(), scope.target(id), &node_id, req).await?;

    Ok(Json(node))
}

/// DELETE /pipeline/{id}/node/{node_id}
/// Delete a node and its edges from the draft
pub async fn delete_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(Uuid, String)>,
    Query(scope): Query<ProjectScope>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting node {} from pipeline: {}", node_id, id);

    graph_service::delete_node(state.store.as_ref(), scope.target(id), &node_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /pipeline/{id}/edge
/// Connect two nodes of the draft
pub async fn create_edge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(scope): Query<ProjectScope>,
    Json(req): Json<CreateEdge>,
) -> ApiResult<Json<Edge>> {
    tracing::info!("Creating edge {} -> {} in pipeline: {}", req.source, req.target, id);

    let edge = graph_service::create_edge(state.store.as_ref(), scope.target(id), req).await?;

    Ok(Json(edge))
}

/// DELETE /pipeline/{id}/edge/{edge_id}
/// Delete an edge from the draft
pub async fn delete_edge(
    State(state): State<AppState>,
    Path((id, edge_id)): Path<(Uuid, String)>,
    Query(scope): Query<ProjectScope>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting edge {} from pipeline: {}", edge_id, id);

    graph_service::delete_edge(state.store.as_ref(), scope.target(id), &edge_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
