//! Service Module
//!
//! Business logic layer for the orchestrator.
//! Services run each operation inside one unit of work and contain the
//! lifecycle and validation rules; repositories only move rows.

pub mod error;
pub mod execution;
pub mod graph;
pub mod pipeline;
pub mod project;
pub mod version;

pub use error::{GraphError, Result};

// Re-export for convenience
pub use execution as execution_service;
pub use graph as graph_service;
pub use pipeline as pipeline_service;
pub use project as project_service;
pub use version as version_service;
