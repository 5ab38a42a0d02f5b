//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the engine
//! without a real search service or document pipeline. The mock
//! search index records every call and models Solr's two-stage
//! visibility: adds and deletes stay pending until a commit applies
//! them.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::{Result, SyncError};
use crate::traits::materializer::{DocumentMaterializer, Materialized};
use crate::traits::search::{CoreAdmin, SearchIndex};
use crate::types::core::IndexCore;
use crate::types::document::{IndexableDocument, RecordId};

/// Record of a call made to the mock search index.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCall {
    DeleteById { core: String, id: RecordId },
    AddOrUpdate { core: String, id: RecordId },
    Commit { core: String },
}

#[derive(Debug, Clone)]
enum PendingOp {
    Add(RecordId, Map<String, Value>),
    Delete(RecordId),
}

/// A mock search service for testing.
///
/// Implements both [`SearchIndex`] and [`CoreAdmin`]. Index state is
/// keyed by core name; a document becomes visible (or disappears)
/// only once the pending operations of its core are committed.
/// Failures are injected per operation and consumed by the next call.
#[derive(Default)]
pub struct MockSearchIndex {
    /// Committed, visible documents per core, keyed by record id
    visible: Arc<RwLock<HashMap<String, HashMap<i64, Map<String, Value>>>>>,

    /// Uncommitted operations per core, in arrival order
    pending: Arc<RwLock<HashMap<String, Vec<PendingOp>>>>,

    /// Cores that exist on the service without having been created here
    existing_cores: Arc<RwLock<HashSet<String>>>,

    /// Cores created through `create_core`, with their configsets
    created: Arc<RwLock<Vec<(String, String)>>>,

    /// One-shot injected failures
    delete_failure: Arc<RwLock<Option<SyncError>>>,
    add_failure: Arc<RwLock<Option<SyncError>>>,
    commit_failure: Arc<RwLock<Option<SyncError>>>,
    create_core_fails: Arc<RwLock<bool>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<SearchCall>>>,
}

impl MockSearchIndex {
    /// Create a new mock with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a committed, visible document into a core.
    pub fn with_indexed_document(self, core: &str, document: IndexableDocument) -> Self {
        self.visible
            .write()
            .unwrap()
            .entry(core.to_string())
            .or_default()
            .insert(document.id.0, document.fields);
        self
    }

    /// Mark a core as already existing on the service.
    pub fn with_existing_core(self, name: impl Into<String>) -> Self {
        self.existing_cores.write().unwrap().insert(name.into());
        self
    }

    /// Fail the next `delete_by_id` call with the given error.
    pub fn with_delete_failure(self, error: SyncError) -> Self {
        *self.delete_failure.write().unwrap() = Some(error);
        self
    }

    /// Fail the next `add_or_update` call with the given error.
    pub fn with_add_failure(self, error: SyncError) -> Self {
        *self.add_failure.write().unwrap() = Some(error);
        self
    }

    /// Fail the next `commit` call with the given error.
    pub fn with_commit_failure(self, error: SyncError) -> Self {
        *self.commit_failure.write().unwrap() = Some(error);
        self
    }

    /// Fail every `create_core` call.
    pub fn with_create_core_failure(self) -> Self {
        *self.create_core_fails.write().unwrap() = true;
        self
    }

    /// All calls made to this mock, in order.
    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of `delete_by_id` calls.
    pub fn delete_count(&self) -> usize {
        self.count(|c| matches!(c, SearchCall::DeleteById { .. }))
    }

    /// Number of `add_or_update` calls.
    pub fn add_count(&self) -> usize {
        self.count(|c| matches!(c, SearchCall::AddOrUpdate { .. }))
    }

    /// Number of `commit` calls.
    pub fn commit_count(&self) -> usize {
        self.count(|c| matches!(c, SearchCall::Commit { .. }))
    }

    /// The committed document with this id in a core, if visible.
    pub fn indexed_document(&self, core: &str, id: i64) -> Option<Map<String, Value>> {
        self.visible
            .read()
            .unwrap()
            .get(core)
            .and_then(|docs| docs.get(&id))
            .cloned()
    }

    /// Number of committed documents in a core.
    pub fn indexed_count(&self, core: &str) -> usize {
        self.visible
            .read()
            .unwrap()
            .get(core)
            .map_or(0, |docs| docs.len())
    }

    /// Names of cores created through `create_core`, in order.
    pub fn created_cores(&self) -> Vec<String> {
        self.created
            .read()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Cores created through `create_core`, with their configsets.
    pub fn created_core_configs(&self) -> Vec<(String, String)> {
        self.created.read().unwrap().clone()
    }

    fn count(&self, matcher: impl Fn(&SearchCall) -> bool) -> usize {
        self.calls.read().unwrap().iter().filter(|c| matcher(c)).count()
    }

    fn record(&self, call: SearchCall) {
        self.calls.write().unwrap().push(call);
    }

    fn take_failure(&self, slot: &Arc<RwLock<Option<SyncError>>>) -> Option<SyncError> {
        slot.write().unwrap().take()
    }
}

#[async_trait]
impl SearchIndex for MockSearchIndex {
    async fn delete_by_id(&self, core: &IndexCore, id: RecordId) -> Result<()> {
        if let Some(err) = self.take_failure(&self.delete_failure) {
            return Err(err);
        }
        self.record(SearchCall::DeleteById {
            core: core.name.clone(),
            id,
        });
        self.pending
            .write()
            .unwrap()
            .entry(core.name.clone())
            .or_default()
            .push(PendingOp::Delete(id));
        Ok(())
    }

    async fn add_or_update(&self, core: &IndexCore, document: &IndexableDocument) -> Result<()> {
        if let Some(err) = self.take_failure(&self.add_failure) {
            return Err(err);
        }
        self.record(SearchCall::AddOrUpdate {
            core: core.name.clone(),
            id: document.id,
        });
        self.pending
            .write()
            .unwrap()
            .entry(core.name.clone())
            .or_default()
            .push(PendingOp::Add(document.id, document.fields.clone()));
        Ok(())
    }

    async fn commit(&self, core: &IndexCore) -> Result<()> {
        if let Some(err) = self.take_failure(&self.commit_failure) {
            return Err(err);
        }
        self.record(SearchCall::Commit {
            core: core.name.clone(),
        });

        let ops = self
            .pending
            .write()
            .unwrap()
            .remove(&core.name)
            .unwrap_or_default();
        let mut visible = self.visible.write().unwrap();
        let docs = visible.entry(core.name.clone()).or_default();
        for op in ops {
            match op {
                PendingOp::Add(id, fields) => {
                    docs.insert(id.0, fields);
                }
                PendingOp::Delete(id) => {
                    docs.remove(&id.0);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CoreAdmin for MockSearchIndex {
    async fn create_core(&self, name: &str, config_set: &str) -> Result<()> {
        if *self.create_core_fails.read().unwrap() {
            return Err(SyncError::SearchServiceRejected {
                status: Some(400),
                message: format!("could not create core {name}"),
            });
        }
        self.created
            .write()
            .unwrap()
            .push((name.to_string(), config_set.to_string()));
        Ok(())
    }

    async fn core_exists(&self, name: &str) -> Result<bool> {
        if self.existing_cores.read().unwrap().contains(name) {
            return Ok(true);
        }
        Ok(self
            .created
            .read()
            .unwrap()
            .iter()
            .any(|(created, _)| created == name))
    }
}

/// A mock document materializer with predefined outcomes per id.
///
/// Unknown ids report `NotReady`, matching a pipeline that has not
/// produced the document yet.
#[derive(Default)]
pub struct MockMaterializer {
    documents: Arc<RwLock<HashMap<i64, IndexableDocument>>>,
    not_ready: Arc<RwLock<HashMap<i64, String>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<RecordId>>>,
}

impl MockMaterializer {
    /// Create a new mock with no known documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document that materializes as `Ready`.
    pub fn with_document(self, document: IndexableDocument) -> Self {
        self.documents
            .write()
            .unwrap()
            .insert(document.id.0, document);
        self
    }

    /// Make an id report `NotReady` with the given reason.
    pub fn with_not_ready(self, id: i64, reason: impl Into<String>) -> Self {
        self.not_ready.write().unwrap().insert(id, reason.into());
        self
    }

    /// Ids materialized so far, in order.
    pub fn calls(&self) -> Vec<RecordId> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl DocumentMaterializer for MockMaterializer {
    async fn materialize(&self, id: RecordId) -> Result<Materialized> {
        self.calls.write().unwrap().push(id);

        if let Some(reason) = self.not_ready.read().unwrap().get(&id.0) {
            return Ok(Materialized::not_ready(reason.clone()));
        }
        match self.documents.read().unwrap().get(&id.0) {
            Some(document) => Ok(Materialized::Ready(document.clone())),
            None => Ok(Materialized::not_ready("unknown document")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::core::CoreId;

    fn core() -> IndexCore {
        IndexCore::new(CoreId(1), "docCore1")
    }

    #[tokio::test]
    async fn documents_become_visible_only_after_commit() {
        let index = MockSearchIndex::new();
        let doc = IndexableDocument::new(5).with_field("title", "Atlas");

        index.add_or_update(&core(), &doc).await.unwrap();
        assert_eq!(index.indexed_document("docCore1", 5), None);

        index.commit(&core()).await.unwrap();
        assert!(index.indexed_document("docCore1", 5).is_some());
    }

    #[tokio::test]
    async fn deletes_apply_at_commit_in_arrival_order() {
        let index = MockSearchIndex::new()
            .with_indexed_document("docCore1", IndexableDocument::new(5));

        index.delete_by_id(&core(), RecordId(5)).await.unwrap();
        assert_eq!(index.indexed_count("docCore1"), 1);

        index.commit(&core()).await.unwrap();
        assert_eq!(index.indexed_count("docCore1"), 0);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_once() {
        let index = MockSearchIndex::new()
            .with_delete_failure(SyncError::SearchServiceUnreachable("down".to_string()));

        assert!(index.delete_by_id(&core(), RecordId(1)).await.is_err());
        assert!(index.delete_by_id(&core(), RecordId(1)).await.is_ok());
    }
}
