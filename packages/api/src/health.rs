//! Service health document — `GET /health`.

use serde::{Deserialize, Serialize};
use socialgraph::GraphAudit;

/// The response body for `GET /health`.
///
/// Reports record counts per collection and the result of auditing the
/// bidirectional subscription bookkeeping. A non-clean audit usually means
/// an earlier multi-record write was interrupted.
///
/// # Example
///
/// ```json
/// {
///   "status": "ok",
///   "name": "socialgraph",
///   "counts": { "users": 2, "posts": 0, "profiles": 0 },
///   "graph": { "asymmetricEdges": [], "selfEdges": [], "danglingEdges": [] }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    /// `"ok"` when the audit is clean, `"degraded"` otherwise.
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub counts: CollectionCounts,

    pub graph: GraphAudit,
}

impl HealthResponse {
    pub const OK: &'static str = "ok";
    pub const DEGRADED: &'static str = "degraded";

    /// Build a response, deriving `status` from the audit.
    pub fn new(name: Option<String>, counts: CollectionCounts, graph: GraphAudit) -> Self {
        let status = if graph.is_clean() { Self::OK } else { Self::DEGRADED };
        Self {
            status: status.to_string(),
            name,
            counts,
            graph,
        }
    }
}

/// Number of records in each collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionCounts {
    pub users: usize,
    pub posts: usize,
    pub profiles: usize,
}
