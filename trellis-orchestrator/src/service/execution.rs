//! Execution Service
//!
//! Resolves a pipeline's graph and hands it to the execution engine.

use std::time::Duration;
use trellis_core::domain::execution::ExecutionReport;
use trellis_core::dto::execution::ExecutePipeline;
use trellis_core::dto::pipeline::PipelineRef;

use crate::engine::ExecutionEngine;
use crate::repository::GraphStore;
use crate::service::Result;
use crate::service::graph::{resolve_graph, with_fixture};
use crate::service::pipeline::load_pipeline;

/// Run a pipeline once.
///
/// An empty graph is replaced by the fixture graph in every mode.
pub async fn execute_pipeline(
    store: &dyn GraphStore,
    engine: &ExecutionEngine,
    target: PipelineRef,
    req: ExecutePipeline,
) -> Result<ExecutionReport> {
    let (pipeline, mut graph) = {
        let mut uow = store.begin().await?;
        let pipeline = load_pipeline(uow.as_mut(), target).await?;
        let graph = resolve_graph(uow.as_mut(), &pipeline, req.mode).await?;
        (pipeline, graph)
    };

    if graph.is_empty() {
        graph = with_fixture(&graph, &pipeline);
    }

    let deadline = req.timeout_ms.map(Duration::from_millis);
    let report = engine.execute(&graph, &req.trigger_input, deadline).await;

    tracing::info!(
        "Pipeline {} executed in {:?} mode: {} nodes, final output {} chars",
        pipeline.id,
        req.mode,
        report.results.len(),
        report.final_output.len()
    );

    Ok(report)
}
