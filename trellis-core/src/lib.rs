//! Trellis Core
//!
//! Core types and graph algorithms for the Trellis agent pipeline system.
//!
//! This crate contains:
//! - Domain types: Core business entities (Project, Pipeline, PipelineVersion, Node, Edge)
//! - DTOs: Request and response shapes shared with callers of the orchestrator
//! - Graph: Pure algorithms over graph snapshots (merging, scheduling, fixtures, node keys)

pub mod domain;
pub mod dto;
pub mod graph;
