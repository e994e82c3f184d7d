//! In-memory store
//!
//! Keeps every table in a single `Vec` per entity behind one async mutex. A
//! unit of work holds the mutex for its whole lifetime and writes into a copy
//! of the state, which replaces the shared state on commit. Units of work are
//! therefore fully serialised, and dropping one discards its writes.
//!
//! The same uniqueness rules as the Postgres schema are enforced: one draft
//! per pipeline, unique node keys per version, and edge endpoints that exist
//! in the edge's version.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use trellis_core::domain::edge::Edge;
use trellis_core::domain::node::Node;
use trellis_core::domain::pipeline::Pipeline;
use trellis_core::domain::project::Project;
use trellis_core::domain::version::{PipelineVersion, VersionState};
use uuid::Uuid;

use crate::repository::{GraphStore, StoreError, StoreResult, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    projects: Vec<Project>,
    pipelines: Vec<Pipeline>,
    versions: Vec<PipelineVersion>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Process-local store for development and tests
#[derive(Clone, Default)]
pub struct InMemoryGraphStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();

        Ok(Box::new(MemoryUnitOfWork {
            guard: Some(guard),
            working,
        }))
    }
}

struct MemoryUnitOfWork {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    working: MemoryState,
}

impl MemoryUnitOfWork {
    fn state(&mut self) -> StoreResult<&mut MemoryState> {
        if self.guard.is_none() {
            return Err(StoreError::Closed);
        }
        Ok(&mut self.working)
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_project(&mut self, project: &Project) -> StoreResult<()> {
        self.state()?.projects.push(project.clone());
        Ok(())
    }

    async fn find_project(&mut self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.state()?.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&mut self) -> StoreResult<Vec<Project>> {
        let mut projects = self.state()?.projects.clone();
        newest_first(&mut projects, |p| p.created_at);
        Ok(projects)
    }

    async fn insert_pipeline(&mut self, pipeline: &Pipeline) -> StoreResult<()> {
        let state = self.state()?;
        if !state.projects.iter().any(|p| p.id == pipeline.project_id) {
            return Err(StoreError::Conflict(format!(
                "project {} does not exist",
                pipeline.project_id
            )));
        }
        state.pipelines.push(pipeline.clone());
        Ok(())
    }

    async fn find_pipeline(&mut self, id: Uuid) -> StoreResult<Option<Pipeline>> {
        Ok(self.state()?.pipelines.iter().find(|p| p.id == id).cloned())
    }

    async fn lock_pipeline(&mut self, id: Uuid) -> StoreResult<Option<Pipeline>> {
        // The whole store is already held by this unit of work
        self.find_pipeline(id).await
    }

    async fn list_pipelines(&mut self, project_id: Uuid) -> StoreResult<Vec<Pipeline>> {
        let mut pipelines: Vec<Pipeline> = self
            .state()?
            .pipelines
            .iter()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect();
        newest_first(&mut pipelines, |p| p.created_at);
        Ok(pipelines)
    }

    async fn set_published_version(
        &mut self,
        pipeline_id: Uuid,
        version_id: Uuid,
    ) -> StoreResult<()> {
        if let Some(pipeline) = self
            .state()?
            .pipelines
            .iter_mut()
            .find(|p| p.id == pipeline_id)
        {
            pipeline.last_published_version_id = Some(version_id);
        }
        Ok(())
    }

    async fn insert_version(&mut self, version: &PipelineVersion) -> StoreResult<()> {
        let state = self.state()?;
        let second_draft = version.is_draft()
            && state
                .versions
                .iter()
                .any(|v| v.pipeline_id == version.pipeline_id && v.is_draft());
        if second_draft {
            return Err(StoreError::Conflict(format!(
                "pipeline {} already has a draft",
                version.pipeline_id
            )));
        }
        state.versions.push(version.clone());
        Ok(())
    }

    async fn update_version(&mut self, version: &PipelineVersion) -> StoreResult<()> {
        if let Some(stored) = self
            .state()?
            .versions
            .iter_mut()
            .find(|v| v.id == version.id)
        {
            stored.number = version.number;
            stored.state = version.state;
            stored.metadata = version.metadata.clone();
            stored.updated_at = version.updated_at;
        }
        Ok(())
    }

    async fn find_version(&mut self, id: Uuid) -> StoreResult<Option<PipelineVersion>> {
        Ok(self.state()?.versions.iter().find(|v| v.id == id).cloned())
    }

    async fn find_version_by_state(
        &mut self,
        pipeline_id: Uuid,
        state: VersionState,
    ) -> StoreResult<Option<PipelineVersion>> {
        Ok(self
            .state()?
            .versions
            .iter()
            .filter(|v| v.pipeline_id == pipeline_id && v.state == state)
            .max_by_key(|v| v.number)
            .cloned())
    }

    async fn max_published_number(&mut self, pipeline_id: Uuid) -> StoreResult<i32> {
        Ok(self
            .state()?
            .versions
            .iter()
            .filter(|v| v.pipeline_id == pipeline_id && v.state == VersionState::Published)
            .map(|v| v.number)
            .max()
            .unwrap_or(0))
    }

    async fn list_versions(&mut self, pipeline_id: Uuid) -> StoreResult<Vec<PipelineVersion>> {
        let mut versions: Vec<PipelineVersion> = self
            .state()?
            .versions
            .iter()
            .filter(|v| v.pipeline_id == pipeline_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| std::cmp::Reverse(v.number));
        Ok(versions)
    }

    async fn insert_node(&mut self, node: &Node) -> StoreResult<()> {
        let state = self.state()?;
        if state
            .nodes
            .iter()
            .any(|n| n.version_id == node.version_id && n.key == node.key)
        {
            return Err(StoreError::Conflict(format!(
                "node key '{}' already used in version {}",
                node.key, node.version_id
            )));
        }
        state.nodes.push(node.clone());
        Ok(())
    }

    async fn update_node(&mut self, node: &Node) -> StoreResult<bool> {
        let state = self.state()?;
        if state
            .nodes
            .iter()
            .any(|n| n.version_id == node.version_id && n.key == node.key && n.id != node.id)
        {
            return Err(StoreError::Conflict(format!(
                "node key '{}' already used in version {}",
                node.key, node.version_id
            )));
        }

        match state
            .nodes
            .iter_mut()
            .find(|n| n.version_id == node.version_id && n.id == node.id)
        {
            Some(stored) => {
                let created_at = stored.created_at;
                *stored = node.clone();
                stored.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_node(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<Option<Node>> {
        Ok(self
            .state()?
            .nodes
            .iter()
            .find(|n| n.version_id == version_id && n.id == id)
            .cloned())
    }

    async fn list_nodes(&mut self, version_id: Uuid) -> StoreResult<Vec<Node>> {
        Ok(self
            .state()?
            .nodes
            .iter()
            .filter(|n| n.version_id == version_id)
            .cloned()
            .collect())
    }

    async fn count_nodes(&mut self, version_id: Uuid) -> StoreResult<i64> {
        Ok(self
            .state()?
            .nodes
            .iter()
            .filter(|n| n.version_id == version_id)
            .count() as i64)
    }

    async fn node_key_exists(&mut self, version_id: Uuid, key: &str) -> StoreResult<bool> {
        Ok(self
            .state()?
            .nodes
            .iter()
            .any(|n| n.version_id == version_id && n.key == key))
    }

    async fn delete_node(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let state = self.state()?;
        let before = state.nodes.len();
        state
            .nodes
            .retain(|n| !(n.version_id == version_id && n.id == id));
        // Mirrors ON DELETE CASCADE
        state.edges.retain(|e| e.source != id && e.target != id);
        Ok(state.nodes.len() < before)
    }

    async fn insert_edge(&mut self, edge: &Edge) -> StoreResult<()> {
        let state = self.state()?;
        let exists = |id: Uuid| {
            state
                .nodes
                .iter()
                .any(|n| n.version_id == edge.version_id && n.id == id)
        };
        if !exists(edge.source) || !exists(edge.target) {
            return Err(StoreError::Conflict(format!(
                "edge {} references a node outside version {}",
                edge.id, edge.version_id
            )));
        }
        if edge.source == edge.target {
            return Err(StoreError::Conflict(format!(
                "edge {} is a self-loop",
                edge.id
            )));
        }
        state.edges.push(edge.clone());
        Ok(())
    }

    async fn list_edges(&mut self, version_id: Uuid) -> StoreResult<Vec<Edge>> {
        Ok(self
            .state()?
            .edges
            .iter()
            .filter(|e| e.version_id == version_id)
            .cloned()
            .collect())
    }

    async fn delete_edge(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let state = self.state()?;
        let before = state.edges.len();
        state
            .edges
            .retain(|e| !(e.version_id == version_id && e.id == id));
        Ok(state.edges.len() < before)
    }

    async fn delete_edges_touching(
        &mut self,
        version_id: Uuid,
        node_id: Uuid,
    ) -> StoreResult<u64> {
        let state = self.state()?;
        let before = state.edges.len();
        state.edges.retain(|e| {
            !(e.version_id == version_id && (e.source == node_id || e.target == node_id))
        });
        Ok((before - state.edges.len()) as u64)
    }

    async fn commit(&mut self) -> StoreResult<()> {
        let mut guard = self.guard.take().ok_or(StoreError::Closed)?;
        *guard = std::mem::take(&mut self.working);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project() -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Demo".to_string(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    fn pipeline(project_id: Uuid) -> Pipeline {
        Pipeline {
            id: Uuid::new_v4(),
            project_id,
            name: "Support bot".to_string(),
            description: String::new(),
            last_published_version_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_commit_makes_writes_visible() {
        let store = InMemoryGraphStore::new();
        let p = project();

        let mut uow = store.begin().await.unwrap();
        uow.insert_project(&p).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.find_project(p.id).await.unwrap(), Some(p));
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() {
        let store = InMemoryGraphStore::new();
        let p = project();

        {
            let mut uow = store.begin().await.unwrap();
            uow.insert_project(&p).await.unwrap();
        }

        let mut uow = store.begin().await.unwrap();
        assert!(uow.find_project(p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_use_after_commit_is_rejected() {
        let store = InMemoryGraphStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.commit().await.unwrap();

        assert!(matches!(
            uow.list_projects().await,
            Err(StoreError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_second_draft_is_a_conflict() {
        let store = InMemoryGraphStore::new();
        let proj = project();
        let pipe = pipeline(proj.id);

        let mut uow = store.begin().await.unwrap();
        uow.insert_project(&proj).await.unwrap();
        uow.insert_pipeline(&pipe).await.unwrap();
        uow.insert_version(&PipelineVersion::draft(Uuid::new_v4(), pipe.id, 1))
            .await
            .unwrap();

        let result = uow
            .insert_version(&PipelineVersion::draft(Uuid::new_v4(), pipe.id, 1))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_pipeline_requires_project() {
        let store = InMemoryGraphStore::new();
        let mut uow = store.begin().await.unwrap();

        let result = uow.insert_pipeline(&pipeline(Uuid::new_v4())).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }
}
