//! Solr API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Update API
// =============================================================================

/// Delete-by-query command body for the update endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteByQueryCommand {
    pub delete: DeleteQuery,
}

impl DeleteByQueryCommand {
    /// Build a delete command for the given query string (e.g. `uid:42`).
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            delete: DeleteQuery {
                query: query.into(),
            },
        }
    }
}

/// The query part of a delete command.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteQuery {
    pub query: String,
}

/// Commit command body for the update endpoint.
///
/// Serializes to `{"commit": {}}`: an explicit commit with default
/// semantics (`waitSearcher=true`), so the change is visible to reads
/// once the request returns.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitCommand {
    pub commit: EmptyBody,
}

/// An empty JSON object (`{}`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyBody {}

// =============================================================================
// Responses
// =============================================================================

/// The `responseHeader` block every Solr response carries.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseHeader {
    /// Zero means success; anything else is a failure.
    pub status: i32,

    /// Query time in milliseconds.
    #[serde(rename = "QTime", default)]
    pub q_time: Option<i64>,
}

/// Response from the update endpoint (add, delete, commit).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResponse {
    #[serde(rename = "responseHeader")]
    pub response_header: ResponseHeader,
}

/// Response from a CoreAdmin `CREATE` request.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreAdminResponse {
    #[serde(rename = "responseHeader")]
    pub response_header: ResponseHeader,

    /// Name of the created core, echoed back on success.
    #[serde(default)]
    pub core: Option<String>,
}

/// Response from a CoreAdmin `STATUS` request.
///
/// The `status` map carries one entry per requested core; a core that
/// does not exist comes back as an empty object under its name.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreStatusResponse {
    #[serde(rename = "responseHeader")]
    pub response_header: ResponseHeader,

    #[serde(default)]
    pub status: Map<String, Value>,
}

impl CoreStatusResponse {
    /// Whether the named core exists (its status entry is non-empty).
    pub fn core_exists(&self, name: &str) -> bool {
        self.status
            .get(name)
            .and_then(Value::as_object)
            .is_some_and(|entry| entry.contains_key("name"))
    }
}

/// Response from the per-core ping handler.
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    #[serde(rename = "responseHeader")]
    pub response_header: ResponseHeader,

    #[serde(default)]
    pub status: Option<String>,
}
