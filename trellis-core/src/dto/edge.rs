//! Edge DTOs

use serde::{Deserialize, Serialize};

/// Request to wire two nodes of the current draft
///
/// Endpoints are node ids as strings so malformed ids can be reported as
/// validation errors rather than rejected by the transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
}
