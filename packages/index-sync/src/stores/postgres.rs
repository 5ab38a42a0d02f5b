//! PostgreSQL record store implementation.
//!
//! Production lookups against the host's tables. Every method is a
//! single indexed query; `core_for_document` joins the document row to
//! its core row in one statement, so reconciliation never runs N+1
//! lookups on a high-volume table.
//!
//! Expected schema (owned and migrated by the host, not by this
//! library): `documents (id, hidden, deleted, solr_core)`,
//! `solr_cores (id, name, deleted)`,
//! `metadata (id, is_listed, index_autocomplete, deleted)`.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::{Result, SyncError};
use crate::traits::store::{CoreRegistry, DocumentStore, MetadataIndexFlags, MetadataStore};
use crate::types::core::{CoreId, IndexCore};
use crate::types::document::{DocumentState, RecordId};

/// PostgreSQL-backed record store.
#[derive(Debug, Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Connect to the given database URL with a small dedicated pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| SyncError::Storage(e.to_string().into()))?;

        Ok(Self::from_pool(pool))
    }

    /// Reuse an existing connection pool, for applications that
    /// already hold one.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PostgresRecordStore {
    async fn document_state(&self, id: RecordId) -> Result<Option<DocumentState>> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT hidden FROM documents WHERE id = $1 AND deleted = FALSE")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| SyncError::Storage(e.to_string().into()))?;

        Ok(row.map(|(hidden,)| DocumentState { hidden }))
    }

    async fn core_for_document(&self, id: RecordId) -> Result<Option<IndexCore>> {
        // The soft-delete filter applies to the core row only: a
        // soft-deleted document must still resolve, its index entry
        // has to remain deletable.
        let row: Option<(i64, String)> = sqlx::query_as(
            "SELECT c.id, c.name
             FROM documents d
             JOIN solr_cores c ON c.id = d.solr_core
             WHERE d.id = $1 AND c.deleted = FALSE",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SyncError::Storage(e.to_string().into()))?;

        Ok(row.map(|(core_id, name)| IndexCore::new(CoreId(core_id), name)))
    }
}

#[async_trait]
impl MetadataStore for PostgresRecordStore {
    async fn metadata_index_flags(&self, id: RecordId) -> Result<Option<MetadataIndexFlags>> {
        let row: Option<(bool, bool)> = sqlx::query_as(
            "SELECT is_listed, index_autocomplete
             FROM metadata
             WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SyncError::Storage(e.to_string().into()))?;

        Ok(row.map(|(is_listed, index_autocomplete)| MetadataIndexFlags {
            is_listed,
            index_autocomplete,
        }))
    }
}

#[async_trait]
impl CoreRegistry for PostgresRecordStore {
    async fn core_count(&self) -> Result<usize> {
        // Unfiltered on purpose: soft-deleted rows keep their core
        // number reserved.
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM solr_cores")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SyncError::Storage(e.to_string().into()))?;

        Ok(count as usize)
    }
}
