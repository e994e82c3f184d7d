//! Data Transfer Objects
//!
//! Request and response shapes exchanged between the orchestrator and its
//! callers. Domain entities stay in `domain`; these types only carry what a
//! single operation needs.

pub mod edge;
pub mod execution;
pub mod graph;
pub mod node;
pub mod pipeline;
pub mod project;
pub mod version;
