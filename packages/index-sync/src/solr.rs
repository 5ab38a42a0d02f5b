//! Solr-backed implementation of the search service traits.
//!
//! A thin adapter over [`solr_client::SolrClient`]: documents are
//! deleted by a `uid:<id>` query, added as single-element batches, and
//! every operation maps client errors into the engine's taxonomy.

use async_trait::async_trait;
use solr_client::SolrClient;

use crate::error::Result;
use crate::traits::search::{CoreAdmin, SearchIndex};
use crate::types::core::IndexCore;
use crate::types::document::{IndexableDocument, RecordId};

/// Search service implementation talking to a real Solr endpoint.
#[derive(Debug, Clone)]
pub struct SolrSearchIndex {
    client: SolrClient,
}

impl SolrSearchIndex {
    pub fn new(client: SolrClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchIndex for SolrSearchIndex {
    async fn delete_by_id(&self, core: &IndexCore, id: RecordId) -> Result<()> {
        self.client
            .delete_by_query(&core.name, &format!("uid:{id}"))
            .await
            .map_err(Into::into)
    }

    async fn add_or_update(&self, core: &IndexCore, document: &IndexableDocument) -> Result<()> {
        self.client
            .add_documents(&core.name, std::slice::from_ref(&document.fields))
            .await
            .map_err(Into::into)
    }

    async fn commit(&self, core: &IndexCore) -> Result<()> {
        self.client.commit(&core.name).await.map_err(Into::into)
    }
}

#[async_trait]
impl CoreAdmin for SolrSearchIndex {
    async fn create_core(&self, name: &str, config_set: &str) -> Result<()> {
        self.client
            .create_core(name, config_set)
            .await
            .map_err(Into::into)
    }

    async fn core_exists(&self, name: &str) -> Result<bool> {
        self.client.core_exists(name).await.map_err(Into::into)
    }
}
