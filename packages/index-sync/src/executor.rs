//! Reconciliation execution.
//!
//! Applies a classified action against the search service: delete by
//! id, or materialize and upsert, each followed by a synchronous
//! commit so the index change is visible before control returns to the
//! host. No retries and no batching across events; a failure is
//! surfaced to the caller and the event is abandoned.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, SyncError};
use crate::traits::materializer::{DocumentMaterializer, Materialized};
use crate::traits::search::SearchIndex;
use crate::types::action::{ReconciliationAction, SkipReason, SyncOutcome};
use crate::types::core::IndexCore;

/// Executes reconciliation actions against one search service.
#[derive(Clone)]
pub struct ReconciliationExecutor {
    search: Arc<dyn SearchIndex>,
    materializer: Arc<dyn DocumentMaterializer>,
}

impl ReconciliationExecutor {
    pub fn new(search: Arc<dyn SearchIndex>, materializer: Arc<dyn DocumentMaterializer>) -> Self {
        Self {
            search,
            materializer,
        }
    }

    /// Apply `action` to the given core.
    ///
    /// - `DeleteFromIndex`: delete by id, then commit. Deleting an id
    ///   that is not indexed succeeds, so repeating a delete is safe.
    /// - `AddOrUpdateIndex`: materialize first; a `NotReady` document
    ///   returns [`SyncError::MaterializationNotReady`] without any
    ///   search-service call, leaving prior index state untouched.
    ///   Otherwise upsert by id, then commit.
    ///
    /// Errors mean the index may be stale for this one document until
    /// a later event; the source record is never affected.
    pub async fn execute(
        &self,
        action: &ReconciliationAction,
        core: &IndexCore,
    ) -> Result<SyncOutcome> {
        match action {
            ReconciliationAction::NoOp => Ok(SyncOutcome::Skipped(SkipReason::NoAction)),
            ReconciliationAction::DeleteFromIndex { id } => {
                self.search.delete_by_id(core, *id).await?;
                self.search.commit(core).await?;
                debug!(document_id = %id, core = %core.name, "removed document from index");
                Ok(SyncOutcome::Deleted {
                    id: *id,
                    core: core.clone(),
                })
            }
            ReconciliationAction::AddOrUpdateIndex { id } => {
                let document = match self.materializer.materialize(*id).await? {
                    Materialized::Ready(document) => document,
                    Materialized::NotReady { reason } => {
                        return Err(SyncError::MaterializationNotReady { id: *id, reason });
                    }
                };
                self.search.add_or_update(core, &document).await?;
                self.search.commit(core).await?;
                debug!(document_id = %id, core = %core.name, "indexed document");
                Ok(SyncOutcome::Indexed {
                    id: *id,
                    core: core.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockMaterializer, MockSearchIndex, SearchCall};
    use crate::types::core::CoreId;
    use crate::types::document::{IndexableDocument, RecordId};

    fn core() -> IndexCore {
        IndexCore::new(CoreId(3), "docCore3")
    }

    #[tokio::test]
    async fn delete_commits_after_deleting() {
        let search = Arc::new(MockSearchIndex::new());
        let executor = ReconciliationExecutor::new(search.clone(), Arc::new(MockMaterializer::new()));

        let outcome = executor
            .execute(&ReconciliationAction::DeleteFromIndex { id: RecordId(42) }, &core())
            .await
            .unwrap();

        assert!(matches!(outcome, SyncOutcome::Deleted { id: RecordId(42), .. }));
        assert_eq!(
            search.calls(),
            vec![
                SearchCall::DeleteById {
                    core: "docCore3".to_string(),
                    id: RecordId(42),
                },
                SearchCall::Commit {
                    core: "docCore3".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn add_materializes_then_upserts_then_commits() {
        let search = Arc::new(MockSearchIndex::new());
        let materializer = Arc::new(
            MockMaterializer::new()
                .with_document(IndexableDocument::new(7).with_field("title", "Atlas")),
        );
        let executor = ReconciliationExecutor::new(search.clone(), materializer);

        let outcome = executor
            .execute(&ReconciliationAction::AddOrUpdateIndex { id: RecordId(7) }, &core())
            .await
            .unwrap();

        assert!(matches!(outcome, SyncOutcome::Indexed { id: RecordId(7), .. }));
        assert_eq!(
            search.calls(),
            vec![
                SearchCall::AddOrUpdate {
                    core: "docCore3".to_string(),
                    id: RecordId(7),
                },
                SearchCall::Commit {
                    core: "docCore3".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn not_ready_documents_never_reach_the_search_service() {
        let search = Arc::new(MockSearchIndex::new());
        let materializer =
            Arc::new(MockMaterializer::new().with_not_ready(7, "source file missing"));
        let executor = ReconciliationExecutor::new(search.clone(), materializer);

        let err = executor
            .execute(&ReconciliationAction::AddOrUpdateIndex { id: RecordId(7) }, &core())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::MaterializationNotReady { id: RecordId(7), .. }
        ));
        assert!(search.calls().is_empty());
    }

    #[tokio::test]
    async fn noop_actions_touch_nothing() {
        let search = Arc::new(MockSearchIndex::new());
        let executor = ReconciliationExecutor::new(search.clone(), Arc::new(MockMaterializer::new()));

        let outcome = executor
            .execute(&ReconciliationAction::NoOp, &core())
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            SyncOutcome::Skipped(SkipReason::NoAction)
        ));
        assert!(search.calls().is_empty());
    }
}
