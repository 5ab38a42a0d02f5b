//! Read-only record store traits.
//!
//! The store layer is split into focused traits so each engine part
//! depends only on the lookups it performs:
//! - `DocumentStore`: document visibility and core resolution
//! - `MetadataStore`: index-control flags for field defaulting
//! - `CoreRegistry`: core-row counting for provisioning
//! - `RecordStore`: composite trait combining all three
//!
//! The engine never writes through these traits; all record writes
//! belong to the host system.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::core::IndexCore;
use crate::types::document::{DocumentState, RecordId};

/// Index-control flags of a metadata row, as currently stored.
///
/// Consulted when an update clears a derived flag without touching the
/// flag it is derived from, so the derived flag can be reset to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataIndexFlags {
    /// Whether the field appears in list views (drives `index_stored`).
    pub is_listed: bool,
    /// Whether the field feeds auto-completion (drives `index_indexed`).
    pub index_autocomplete: bool,
}

/// Lookups against the document table.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Visibility state of a live document row.
    ///
    /// Returns `None` for unknown or soft-deleted rows.
    async fn document_state(&self, id: RecordId) -> Result<Option<DocumentState>>;

    /// The index core a document belongs to, by joining the document
    /// row to its core reference.
    ///
    /// The soft-delete predicate applies to the core row only: a
    /// soft-deleted document still resolves, because its index entry
    /// must remain deletable. A missing document row or a soft-deleted
    /// core resolves to `None`.
    async fn core_for_document(&self, id: RecordId) -> Result<Option<IndexCore>>;
}

/// Lookups against the metadata table.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Current index-control flags of a live metadata row.
    async fn metadata_index_flags(&self, id: RecordId) -> Result<Option<MetadataIndexFlags>>;
}

/// Lookups against the core registry table.
#[async_trait]
pub trait CoreRegistry: Send + Sync {
    /// Number of core rows, soft-deleted included, so provisioning
    /// never reuses a core number.
    async fn core_count(&self) -> Result<usize>;
}

/// Composite store trait combining all record lookups.
pub trait RecordStore: DocumentStore + MetadataStore + CoreRegistry {}

// Blanket implementation: anything implementing all three traits is a RecordStore
impl<T: DocumentStore + MetadataStore + CoreRegistry> RecordStore for T {}
