//! Postgres store
//!
//! Each unit of work wraps one database transaction. The per-entity modules
//! hold the SQL as free functions over a connection; [`PgUnitOfWork`] routes
//! the trait calls to them and maps constraint violations to
//! [`StoreError::Conflict`].

pub mod edge;
pub mod node;
pub mod pipeline;
pub mod project;
pub mod version;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use trellis_core::domain::edge::Edge;
use trellis_core::domain::node::Node;
use trellis_core::domain::pipeline::Pipeline;
use trellis_core::domain::project::Project;
use trellis_core::domain::version::{PipelineVersion, VersionState};
use uuid::Uuid;

use crate::repository::{GraphStore, StoreError, StoreResult, UnitOfWork};

/// Store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgGraphStore {
    pool: PgPool,
}

impl PgGraphStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GraphStore for PgGraphStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx: Some(tx) }))
    }
}

/// A single transaction; rolled back by sqlx when dropped uncommitted
pub struct PgUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgUnitOfWork {
    fn conn(&mut self) -> StoreResult<&mut PgConnection> {
        self.tx.as_deref_mut().ok_or(StoreError::Closed)
    }
}

/// Turns constraint violations into conflicts, everything else stays a database error
fn write_error(err: sqlx::Error) -> StoreError {
    let violation = err.as_database_error().and_then(|db| {
        if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() {
            Some(db.message().to_string())
        } else {
            None
        }
    });

    match violation {
        Some(message) => StoreError::Conflict(message),
        None => StoreError::Database(err),
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_project(&mut self, project: &Project) -> StoreResult<()> {
        project::insert(self.conn()?, project)
            .await
            .map_err(write_error)
    }

    async fn find_project(&mut self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(project::find_by_id(self.conn()?, id).await?)
    }

    async fn list_projects(&mut self) -> StoreResult<Vec<Project>> {
        Ok(project::list_all(self.conn()?).await?)
    }

    async fn insert_pipeline(&mut self, pipeline: &Pipeline) -> StoreResult<()> {
        pipeline::insert(self.conn()?, pipeline)
            .await
            .map_err(write_error)
    }

    async fn find_pipeline(&mut self, id: Uuid) -> StoreResult<Option<Pipeline>> {
        Ok(pipeline::find_by_id(self.conn()?, id).await?)
    }

    async fn lock_pipeline(&mut self, id: Uuid) -> StoreResult<Option<Pipeline>> {
        Ok(pipeline::lock_by_id(self.conn()?, id).await?)
    }

    async fn list_pipelines(&mut self, project_id: Uuid) -> StoreResult<Vec<Pipeline>> {
        Ok(pipeline::list_by_project(self.conn()?, project_id).await?)
    }

    async fn set_published_version(
        &mut self,
        pipeline_id: Uuid,
        version_id: Uuid,
    ) -> StoreResult<()> {
        pipeline::set_published_version(self.conn()?, pipeline_id, version_id)
            .await
            .map_err(write_error)
    }

    async fn insert_version(&mut self, version: &PipelineVersion) -> StoreResult<()> {
        version::insert(self.conn()?, version)
            .await
            .map_err(write_error)
    }

    async fn update_version(&mut self, version: &PipelineVersion) -> StoreResult<()> {
        version::update(self.conn()?, version)
            .await
            .map_err(write_error)
    }

    async fn find_version(&mut self, id: Uuid) -> StoreResult<Option<PipelineVersion>> {
        version::find_by_id(self.conn()?, id)
            .await?
            .map(PipelineVersion::try_from)
            .transpose()
    }

    async fn find_version_by_state(
        &mut self,
        pipeline_id: Uuid,
        state: VersionState,
    ) -> StoreResult<Option<PipelineVersion>> {
        version::find_by_state(self.conn()?, pipeline_id, state)
            .await?
            .map(PipelineVersion::try_from)
            .transpose()
    }

    async fn max_published_number(&mut self, pipeline_id: Uuid) -> StoreResult<i32> {
        Ok(version::max_published_number(self.conn()?, pipeline_id).await?)
    }

    async fn list_versions(&mut self, pipeline_id: Uuid) -> StoreResult<Vec<PipelineVersion>> {
        version::list_by_pipeline(self.conn()?, pipeline_id)
            .await?
            .into_iter()
            .map(PipelineVersion::try_from)
            .collect()
    }

    async fn insert_node(&mut self, node: &Node) -> StoreResult<()> {
        node::insert(self.conn()?, node).await.map_err(write_error)
    }

    async fn update_node(&mut self, node: &Node) -> StoreResult<bool> {
        node::update(self.conn()?, node).await.map_err(write_error)
    }

    async fn find_node(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<Option<Node>> {
        node::find_by_id(self.conn()?, version_id, id)
            .await?
            .map(Node::try_from)
            .transpose()
    }

    async fn list_nodes(&mut self, version_id: Uuid) -> StoreResult<Vec<Node>> {
        node::list_by_version(self.conn()?, version_id)
            .await?
            .into_iter()
            .map(Node::try_from)
            .collect()
    }

    async fn count_nodes(&mut self, version_id: Uuid) -> StoreResult<i64> {
        Ok(node::count_by_version(self.conn()?, version_id).await?)
    }

    async fn node_key_exists(&mut self, version_id: Uuid, key: &str) -> StoreResult<bool> {
        Ok(node::key_exists(self.conn()?, version_id, key).await?)
    }

    async fn delete_node(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<bool> {
        Ok(node::delete(self.conn()?, version_id, id).await?)
    }

    async fn insert_edge(&mut self, edge: &Edge) -> StoreResult<()> {
        edge::insert(self.conn()?, edge).await.map_err(write_error)
    }

    async fn list_edges(&mut self, version_id: Uuid) -> StoreResult<Vec<Edge>> {
        Ok(edge::list_by_version(self.conn()?, version_id).await?)
    }

    async fn delete_edge(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<bool> {
        Ok(edge::delete(self.conn()?, version_id, id).await?)
    }

    async fn delete_edges_touching(
        &mut self,
        version_id: Uuid,
        node_id: Uuid,
    ) -> StoreResult<u64> {
        Ok(edge::delete_touching(self.conn()?, version_id, node_id).await?)
    }

    async fn commit(&mut self) -> StoreResult<()> {
        let tx = self.tx.take().ok_or(StoreError::Closed)?;
        tx.commit().await?;
        Ok(())
    }
}
