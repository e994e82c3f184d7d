//! Repository Module
//!
//! Data access layer for the orchestrator. Every read and write goes through
//! a [`UnitOfWork`] obtained from a [`GraphStore`]: committing applies all of
//! its writes at once, dropping it without committing discards them.
//!
//! Repositories hold no policy. They never assign identities, validate input
//! or decide which version is current; the service layer does that.
//!
//! All repositories are trait-based so the services can run against Postgres
//! in production and against the in-memory store in tests.

pub mod graph;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use trellis_core::domain::edge::Edge;
use trellis_core::domain::node::Node;
use trellis_core::domain::pipeline::Pipeline;
use trellis_core::domain::project::Project;
use trellis_core::domain::version::{PipelineVersion, VersionState};
use uuid::Uuid;

// Re-export implementations
pub use graph as graph_repository;
pub use memory::InMemoryGraphStore;
pub use postgres::PgGraphStore;

/// Errors raised by a store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness or referential constraint was violated
    #[error("constraint violated: {0}")]
    Conflict(String),

    /// A stored value could not be mapped back to a domain type
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// The unit of work was used after it committed
    #[error("unit of work already finished")]
    Closed,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Entry point of a transactional record store
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Starts a new unit of work
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}

/// A transactional view of the store
///
/// Writes become visible to other units of work only after [`commit`].
///
/// [`commit`]: UnitOfWork::commit
#[async_trait]
pub trait UnitOfWork: Send {
    // -------------------------------------------------------------------------
    // Projects
    // -------------------------------------------------------------------------

    async fn insert_project(&mut self, project: &Project) -> StoreResult<()>;

    async fn find_project(&mut self, id: Uuid) -> StoreResult<Option<Project>>;

    /// All projects, newest first
    async fn list_projects(&mut self) -> StoreResult<Vec<Project>>;

    // -------------------------------------------------------------------------
    // Pipelines
    // -------------------------------------------------------------------------

    async fn insert_pipeline(&mut self, pipeline: &Pipeline) -> StoreResult<()>;

    async fn find_pipeline(&mut self, id: Uuid) -> StoreResult<Option<Pipeline>>;

    /// Loads a pipeline and holds it exclusively until this unit of work ends.
    ///
    /// Version-mutating operations call this first so that two of them never
    /// interleave on the same pipeline.
    async fn lock_pipeline(&mut self, id: Uuid) -> StoreResult<Option<Pipeline>>;

    /// Pipelines of a project, newest first
    async fn list_pipelines(&mut self, project_id: Uuid) -> StoreResult<Vec<Pipeline>>;

    async fn set_published_version(
        &mut self,
        pipeline_id: Uuid,
        version_id: Uuid,
    ) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Versions
    // -------------------------------------------------------------------------

    /// Fails with [`StoreError::Conflict`] if a second draft would exist
    async fn insert_version(&mut self, version: &PipelineVersion) -> StoreResult<()>;

    /// Overwrites state, number and metadata of an existing version
    async fn update_version(&mut self, version: &PipelineVersion) -> StoreResult<()>;

    async fn find_version(&mut self, id: Uuid) -> StoreResult<Option<PipelineVersion>>;

    /// The highest-numbered version of a pipeline in the given state
    async fn find_version_by_state(
        &mut self,
        pipeline_id: Uuid,
        state: VersionState,
    ) -> StoreResult<Option<PipelineVersion>>;

    /// Highest number among published versions, 0 if none
    async fn max_published_number(&mut self, pipeline_id: Uuid) -> StoreResult<i32>;

    /// All versions of a pipeline, highest number first
    async fn list_versions(&mut self, pipeline_id: Uuid) -> StoreResult<Vec<PipelineVersion>>;

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    async fn insert_node(&mut self, node: &Node) -> StoreResult<()>;

    /// Returns false if no node with this id exists in the node's version
    async fn update_node(&mut self, node: &Node) -> StoreResult<bool>;

    async fn find_node(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<Option<Node>>;

    /// Nodes of a version in insertion order
    async fn list_nodes(&mut self, version_id: Uuid) -> StoreResult<Vec<Node>>;

    async fn count_nodes(&mut self, version_id: Uuid) -> StoreResult<i64>;

    async fn node_key_exists(&mut self, version_id: Uuid, key: &str) -> StoreResult<bool>;

    /// Returns false if nothing was deleted
    async fn delete_node(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<bool>;

    // -------------------------------------------------------------------------
    // Edges
    // -------------------------------------------------------------------------

    async fn insert_edge(&mut self, edge: &Edge) -> StoreResult<()>;

    /// Edges of a version in insertion order
    async fn list_edges(&mut self, version_id: Uuid) -> StoreResult<Vec<Edge>>;

    /// Returns false if nothing was deleted
    async fn delete_edge(&mut self, version_id: Uuid, id: Uuid) -> StoreResult<bool>;

    /// Deletes every edge starting or ending at a node, returning the count
    async fn delete_edges_touching(&mut self, version_id: Uuid, node_id: Uuid)
    -> StoreResult<u64>;

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Applies every write of this unit of work atomically
    async fn commit(&mut self) -> StoreResult<()>;
}
