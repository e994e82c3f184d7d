//! Version Service
//!
//! Owns the draft/published lifecycle of a pipeline. A pipeline always has
//! exactly one draft once bootstrapped; publishing freezes it and forks a new
//! draft holding copies of its nodes and edges.

use std::collections::HashMap;
use trellis_core::domain::version::{PipelineVersion, VersionState};
use trellis_core::dto::pipeline::PipelineRef;
use trellis_core::dto::version::{PublishVersion, PublishedVersion};
use uuid::Uuid;

use crate::repository::{GraphStore, UnitOfWork};
use crate::service::pipeline::{load_pipeline, lock_pipeline};
use crate::service::{GraphError, Result};

/// Return the pipeline's draft, creating it if the pipeline has none
pub async fn ensure_draft(store: &dyn GraphStore, target: PipelineRef) -> Result<PipelineVersion> {
    let mut uow = store.begin().await?;
    let pipeline = lock_pipeline(uow.as_mut(), target).await?;
    let draft = ensure_draft_in(uow.as_mut(), pipeline.id).await?;
    uow.commit().await?;
    Ok(draft)
}

/// [`ensure_draft`] inside an existing unit of work.
///
/// The caller is expected to hold the pipeline lock.
pub(crate) async fn ensure_draft_in(
    uow: &mut dyn UnitOfWork,
    pipeline_id: Uuid,
) -> Result<PipelineVersion> {
    if let Some(draft) = uow
        .find_version_by_state(pipeline_id, VersionState::Draft)
        .await?
    {
        return Ok(draft);
    }

    let number = uow.max_published_number(pipeline_id).await? + 1;
    let draft = PipelineVersion::draft(Uuid::new_v4(), pipeline_id, number);
    uow.insert_version(&draft).await?;

    tracing::info!(
        "Draft bootstrapped for pipeline {}: version {} ({})",
        pipeline_id,
        draft.number,
        draft.id
    );

    Ok(draft)
}

/// Freeze the current draft as the next published version and fork a new
/// draft from it.
///
/// Runs as one unit of work: on any failure nothing is applied.
pub async fn publish(
    store: &dyn GraphStore,
    target: PipelineRef,
    req: PublishVersion,
) -> Result<PublishedVersion> {
    let mut uow = store.begin().await?;
    let pipeline = lock_pipeline(uow.as_mut(), target).await?;
    let mut draft = ensure_draft_in(uow.as_mut(), pipeline.id).await?;

    if uow.count_nodes(draft.id).await? == 0 {
        return Err(GraphError::FailedPrecondition(format!(
            "Pipeline {} cannot be published: the draft has no nodes",
            pipeline.id
        )));
    }

    let now = chrono::Utc::now();
    let next = uow.max_published_number(pipeline.id).await? + 1;

    draft.state = VersionState::Published;
    draft.number = next;
    draft.metadata.notes = Some(req.notes.trim().to_string()).filter(|n| !n.is_empty());
    draft.metadata.published_at = Some(now);
    draft.updated_at = now;
    uow.update_version(&draft).await?;
    uow.set_published_version(pipeline.id, draft.id).await?;

    let successor = PipelineVersion::draft(Uuid::new_v4(), pipeline.id, next + 1);
    uow.insert_version(&successor).await?;

    // Identities are remapped before any edge is copied
    let nodes = uow.list_nodes(draft.id).await?;
    let mut id_map: HashMap<Uuid, Uuid> = HashMap::with_capacity(nodes.len());
    for node in &nodes {
        let clone = node.fork(Uuid::new_v4(), successor.id);
        id_map.insert(node.id, clone.id);
        uow.insert_node(&clone).await?;
    }

    let edges = uow.list_edges(draft.id).await?;
    let mut copied_edges = 0;
    for edge in &edges {
        match (id_map.get(&edge.source), id_map.get(&edge.target)) {
            (Some(source), Some(target)) => {
                let clone = edge.fork(Uuid::new_v4(), successor.id, *source, *target);
                uow.insert_edge(&clone).await?;
                copied_edges += 1;
            }
            _ => tracing::warn!(
                "Edge {} of version {} has an endpoint outside the version, not copied",
                edge.id,
                draft.id
            ),
        }
    }

    uow.commit().await?;

    tracing::info!(
        "Pipeline {} published as version {} ({}); new draft {} with {} nodes and {} edges",
        pipeline.id,
        next,
        draft.id,
        successor.number,
        nodes.len(),
        copied_edges
    );

    Ok(PublishedVersion {
        version_id: draft.id,
        version_number: next,
    })
}

/// List every version of a pipeline, newest number first
pub async fn list_versions(
    store: &dyn GraphStore,
    target: PipelineRef,
) -> Result<Vec<PipelineVersion>> {
    let mut uow = store.begin().await?;
    let pipeline = load_pipeline(uow.as_mut(), target).await?;
    let versions = uow.list_versions(pipeline.id).await?;
    Ok(versions)
}
