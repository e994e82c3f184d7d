//! Graph algorithms
//!
//! Pure functions over graph snapshots: merging two snapshots, computing a
//! deterministic execution order, the fixture graph shown for empty
//! pipelines, and node key generation.

pub mod fixture;
pub mod key;
pub mod merge;
pub mod schedule;

pub use fixture::fixture_graph;
pub use merge::merge;
pub use schedule::{Schedule, topological_order};
