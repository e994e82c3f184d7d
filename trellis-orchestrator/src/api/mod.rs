//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod execution;
pub mod graph;
pub mod health;
pub mod pipeline;
pub mod project;
pub mod version;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::engine::ExecutionEngine;
use crate::repository::GraphStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GraphStore>,
    pub engine: Arc<ExecutionEngine>,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Project endpoints
        .route("/project/create", post(project::create_project))
        .route("/project/list", get(project::list_projects))
        .route(
            "/project/{project_id}/pipelines",
            get(project::list_project_pipelines),
        )
        // Pipeline endpoints
        .route("/pipeline/create", post(pipeline::create_pipeline))
        .route("/pipeline/{id}", get(pipeline::get_pipeline))
        .route("/pipeline/{id}/versions", get(version::list_versions))
        .route("/pipeline/{id}/draft", post(version::ensure_draft))
        .route("/pipeline/{id}/publish", post(version::publish))
        // Graph endpoints
        .route("/pipeline/{id}/graph", get(graph::get_graph))
        .route("/pipeline/{id}/node", post(graph::create_node))
        .route(
            "/pipeline/{id}/node/{node_id}",
            put(graph::update_node).delete(graph::delete_node),
        )
        .route("/pipeline/{id}/edge", post(graph::create_edge))
        .route(
            "/pipeline/{id}/edge/{edge_id}",
            delete(graph::delete_edge),
        )
        // Execution endpoints
        .route("/pipeline/{id}/execute", post(execution::execute_pipeline))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
