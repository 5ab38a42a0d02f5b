//! Document materialization trait.
//!
//! Producing the full indexable representation of a document (file
//! parsing, metadata extraction) is the host application's job. The
//! executor consumes this narrow interface and never indexes a partial
//! document.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::{IndexableDocument, RecordId};

/// Result of materializing one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Materialized {
    /// The full indexable representation.
    Ready(IndexableDocument),
    /// The document cannot be indexed right now, e.g. its source file
    /// or required metadata is missing.
    NotReady { reason: String },
}

impl Materialized {
    /// A `NotReady` value with the given reason.
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self::NotReady {
            reason: reason.into(),
        }
    }
}

/// Builds the indexable representation of a document by id.
#[async_trait]
pub trait DocumentMaterializer: Send + Sync {
    /// Load and derive the full indexable document for `id`.
    ///
    /// Reports `NotReady` instead of erroring when the document exists
    /// but its content is unavailable; errors are reserved for lookup
    /// failures.
    async fn materialize(&self, id: RecordId) -> Result<Materialized>;
}
