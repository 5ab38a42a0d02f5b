//! Core resolution.
//!
//! Maps a document to the search-index core it belongs to, via a
//! single joined lookup on the record store. Runs once per mutation
//! event, so implementations behind [`DocumentStore`] must keep it one
//! indexed query.

use std::sync::Arc;

use crate::error::{Result, SyncError};
use crate::traits::store::DocumentStore;
use crate::types::core::IndexCore;
use crate::types::document::RecordId;

/// Resolves documents to their index cores.
#[derive(Clone)]
pub struct CoreResolver {
    store: Arc<dyn DocumentStore>,
}

impl CoreResolver {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The core the document belongs to, or `None` when the document
    /// has no resolvable core (unknown id, no core reference, or the
    /// core row is soft-deleted).
    pub async fn resolve(&self, id: RecordId) -> Result<Option<IndexCore>> {
        self.store.core_for_document(id).await
    }

    /// Like [`resolve`](Self::resolve), but an unresolvable core is an
    /// error. For callers driving the executor directly; the dispatcher
    /// itself treats `None` as a skip, never an error.
    pub async fn require(&self, id: RecordId) -> Result<IndexCore> {
        self.resolve(id)
            .await?
            .ok_or(SyncError::CoreNotResolved { id })
    }
}
