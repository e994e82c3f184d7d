//! Core domain types
//!
//! This module contains the core domain structures used across Trellis.
//! Stored entities (projects, pipelines, versions, nodes, edges) are keyed by
//! UUIDs; graph snapshots use string identities so that stored graphs and the
//! fixture graph can be merged and executed the same way.

pub mod edge;
pub mod execution;
pub mod graph;
pub mod node;
pub mod pipeline;
pub mod project;
pub mod version;
