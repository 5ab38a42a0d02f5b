//! Typed errors for the synchronization engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Every error here is
//! local to a single mutation event: the dispatcher logs it and moves
//! on, it is never re-raised across the host's transaction boundary.

use thiserror::Error;

use crate::types::document::RecordId;

/// Errors that can occur while reconciling one mutation event.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No index core row could be resolved for the document
    #[error("no index core resolved for document {id}")]
    CoreNotResolved { id: RecordId },

    /// The materializer reported the document content unavailable;
    /// the index is left untouched until a later successful event
    #[error("document {id} is not ready for indexing: {reason}")]
    MaterializationNotReady { id: RecordId, reason: String },

    /// The search service could not be reached at all
    #[error("search service unreachable: {0}")]
    SearchServiceUnreachable(String),

    /// The search service answered with a non-success status
    #[error("search service rejected the operation: {message}")]
    SearchServiceRejected {
        /// Status code reported by the service, when one was received.
        status: Option<i32>,
        message: String,
    },

    /// A record-store lookup failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<solr_client::SolrError> for SyncError {
    fn from(err: solr_client::SolrError) -> Self {
        use solr_client::SolrError;
        match err {
            SolrError::Network(message) => Self::SearchServiceUnreachable(message),
            SolrError::Api { status, body } => Self::SearchServiceRejected {
                status: Some(status),
                message: body,
            },
            SolrError::Parse(message) => Self::SearchServiceRejected {
                status: None,
                message: format!("unparseable response: {message}"),
            },
            SolrError::Config(message) => Self::SearchServiceRejected {
                status: None,
                message,
            },
        }
    }
}

/// Result type alias for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solr_errors_map_to_the_sync_taxonomy() {
        let unreachable: SyncError =
            solr_client::SolrError::Network("connection refused".to_string()).into();
        assert!(matches!(
            unreachable,
            SyncError::SearchServiceUnreachable(_)
        ));

        let rejected: SyncError = solr_client::SolrError::Api {
            status: 400,
            body: "bad request".to_string(),
        }
        .into();
        assert!(matches!(
            rejected,
            SyncError::SearchServiceRejected {
                status: Some(400),
                ..
            }
        ));
    }
}
