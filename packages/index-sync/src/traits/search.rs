//! Search service traits.
//!
//! `SearchIndex` covers per-core document operations, `CoreAdmin`
//! covers core lifecycle. Both sit in front of the real Solr client so
//! tests can substitute a recording mock with failure injection.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::core::IndexCore;
use crate::types::document::{IndexableDocument, RecordId};

/// Document operations against one search-index core.
///
/// Every operation is a remote call returning success or failure; a
/// non-success service status is a failure. Implementations must not
/// retry on their own.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Remove the document with the given id from a core.
    ///
    /// Deleting an id that is not indexed is a success, which keeps the
    /// operation idempotent.
    async fn delete_by_id(&self, core: &IndexCore, id: RecordId) -> Result<()>;

    /// Add a document to a core, replacing any previous document with
    /// the same id (upsert semantics, never a duplicate).
    async fn add_or_update(&self, core: &IndexCore, document: &IndexableDocument) -> Result<()>;

    /// Commit pending changes on a core, making them visible to reads.
    async fn commit(&self, core: &IndexCore) -> Result<()>;
}

/// Core lifecycle operations on the search service.
#[async_trait]
pub trait CoreAdmin: Send + Sync {
    /// Create a core with the given name from a named configset.
    async fn create_core(&self, name: &str, config_set: &str) -> Result<()>;

    /// Whether a core with the given name already exists.
    async fn core_exists(&self, name: &str) -> Result<bool>;
}
