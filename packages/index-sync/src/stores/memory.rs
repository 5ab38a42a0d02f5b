//! In-memory record store for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::store::{CoreRegistry, DocumentStore, MetadataIndexFlags, MetadataStore};
use crate::types::core::{CoreId, IndexCore};
use crate::types::document::{DocumentState, RecordId};

#[derive(Debug, Clone)]
struct DocumentRow {
    hidden: bool,
    deleted: bool,
    core_id: Option<i64>,
}

#[derive(Debug, Clone)]
struct CoreRow {
    name: String,
    deleted: bool,
}

#[derive(Debug, Clone, Copy)]
struct MetadataRow {
    is_listed: bool,
    index_autocomplete: bool,
}

/// In-memory record store mirroring the host's table semantics,
/// soft-deletion included.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    documents: RwLock<HashMap<i64, DocumentRow>>,
    cores: RwLock<HashMap<i64, CoreRow>>,
    metadata: RwLock<HashMap<i64, MetadataRow>>,
}

impl MemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document row.
    pub fn insert_document(&self, id: i64, hidden: bool, core_id: Option<i64>) {
        self.documents.write().unwrap().insert(
            id,
            DocumentRow {
                hidden,
                deleted: false,
                core_id,
            },
        );
    }

    /// Insert a core row.
    pub fn insert_core(&self, id: i64, name: &str) {
        self.cores.write().unwrap().insert(
            id,
            CoreRow {
                name: name.to_string(),
                deleted: false,
            },
        );
    }

    /// Insert a metadata row with its index-control flags.
    pub fn insert_metadata(&self, id: i64, is_listed: bool, index_autocomplete: bool) {
        self.metadata.write().unwrap().insert(
            id,
            MetadataRow {
                is_listed,
                index_autocomplete,
            },
        );
    }

    /// Change a document's hidden flag, as the host's update would.
    pub fn set_hidden(&self, id: i64, hidden: bool) {
        if let Some(row) = self.documents.write().unwrap().get_mut(&id) {
            row.hidden = hidden;
        }
    }

    /// Soft-delete a document row, as the host's delete would.
    pub fn mark_deleted(&self, id: i64) {
        if let Some(row) = self.documents.write().unwrap().get_mut(&id) {
            row.deleted = true;
        }
    }

    /// Restore a soft-deleted document row, as the host's undelete
    /// would.
    pub fn restore(&self, id: i64) {
        if let Some(row) = self.documents.write().unwrap().get_mut(&id) {
            row.deleted = false;
        }
    }

    /// Soft-delete a core row.
    pub fn mark_core_deleted(&self, id: i64) {
        if let Some(row) = self.cores.write().unwrap().get_mut(&id) {
            row.deleted = true;
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryRecordStore {
    async fn document_state(&self, id: RecordId) -> Result<Option<DocumentState>> {
        Ok(self
            .documents
            .read()
            .unwrap()
            .get(&id.0)
            .filter(|row| !row.deleted)
            .map(|row| DocumentState { hidden: row.hidden }))
    }

    async fn core_for_document(&self, id: RecordId) -> Result<Option<IndexCore>> {
        // The document side of the join is unfiltered: a soft-deleted
        // document still resolves its core. Only a soft-deleted core
        // row breaks resolution.
        let core_id = match self.documents.read().unwrap().get(&id.0) {
            Some(row) => row.core_id,
            None => None,
        };
        let Some(core_id) = core_id else {
            return Ok(None);
        };

        Ok(self
            .cores
            .read()
            .unwrap()
            .get(&core_id)
            .filter(|core| !core.deleted)
            .map(|core| IndexCore::new(CoreId(core_id), core.name.clone())))
    }
}

#[async_trait]
impl MetadataStore for MemoryRecordStore {
    async fn metadata_index_flags(&self, id: RecordId) -> Result<Option<MetadataIndexFlags>> {
        Ok(self
            .metadata
            .read()
            .unwrap()
            .get(&id.0)
            .map(|row| MetadataIndexFlags {
                is_listed: row.is_listed,
                index_autocomplete: row.index_autocomplete,
            }))
    }
}

#[async_trait]
impl CoreRegistry for MemoryRecordStore {
    async fn core_count(&self) -> Result<usize> {
        // Soft-deleted rows count too, so core numbers are not reused.
        Ok(self.cores.read().unwrap().len())
    }
}
