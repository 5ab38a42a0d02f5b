//! Error types for the Solr client.

use thiserror::Error;

/// Result type for Solr client operations.
pub type Result<T> = std::result::Result<T, SolrError>;

/// Solr client errors.
#[derive(Debug, Error)]
pub enum SolrError {
    /// Configuration error (unparseable base URL, bad connection parameters)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection refused, DNS failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Solr rejected the request (non-2xx HTTP response or non-zero update status)
    #[error("Solr error (status {status}): {body}")]
    Api { status: i32, body: String },

    /// Parse error (unexpected response shape)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SolrError {
    /// The status code Solr reported, when the failure carries one.
    pub fn status(&self) -> Option<i32> {
        match self {
            SolrError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
