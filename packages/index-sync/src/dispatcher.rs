//! Event dispatch: the boundary between the host's mutation pipeline
//! and the engine.
//!
//! Mirrors the host's two hook call sites: a pre-commit phase that may
//! adjust the pending field map, and a post-commit phase that drives
//! index reconciliation. Both entry points are infallible at the
//! boundary. Every failure is logged and folded into the returned
//! outcome, because a search-side failure must never abort the host's
//! record write.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, warn};

use crate::classifier::classify;
use crate::defaults::FieldDefaults;
use crate::error::{Result, SyncError};
use crate::executor::ReconciliationExecutor;
use crate::provision::CoreProvisioner;
use crate::resolver::CoreResolver;
use crate::traits::materializer::DocumentMaterializer;
use crate::traits::search::SearchIndex;
use crate::traits::store::{DocumentStore, RecordStore};
use crate::types::action::{SkipReason, SyncOutcome};
use crate::types::document::DocumentState;
use crate::types::event::{HookPhase, MutationEvent, MutationKind, RecordTable};

/// Receives mutation events from the host and runs the engine.
///
/// Processing is strictly sequential and fully awaited within the
/// host's own control flow: classification, then resolution, then
/// execution. No background work, no queue.
#[derive(Clone)]
pub struct EventDispatcher {
    store: Arc<dyn DocumentStore>,
    resolver: CoreResolver,
    executor: ReconciliationExecutor,
    defaults: FieldDefaults,
    provisioner: Option<CoreProvisioner>,
}

impl EventDispatcher {
    /// Wire a dispatcher from its three external seams.
    pub fn new<S>(
        store: Arc<S>,
        search: Arc<dyn SearchIndex>,
        materializer: Arc<dyn DocumentMaterializer>,
    ) -> Self
    where
        S: RecordStore + 'static,
    {
        Self {
            resolver: CoreResolver::new(store.clone()),
            defaults: FieldDefaults::new(store.clone()),
            store,
            executor: ReconciliationExecutor::new(search, materializer),
            provisioner: None,
        }
    }

    /// Enable search-core provisioning for new core registry rows.
    ///
    /// Without a provisioner, inserts into the core registry table are
    /// left untouched (for hosts that manage cores out of band).
    pub fn with_provisioner(mut self, provisioner: CoreProvisioner) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    /// Pre-commit hook: adjust the pending field map in place.
    ///
    /// Applies per-table defaulting rules on insert and update, and
    /// provisions a search core for new core registry rows. A
    /// provisioning failure clears the field map so the host rejects
    /// the row; any other failure leaves the map as submitted.
    pub async fn handle_pre(&self, event: &mut MutationEvent) {
        if event.phase != HookPhase::Pre {
            return;
        }

        match event.kind {
            MutationKind::Insert => {
                if event.table == RecordTable::SolrCores {
                    self.provision_new_core(event).await;
                } else {
                    self.defaults
                        .apply_insert(event.table, &mut event.changed_fields);
                }
            }
            MutationKind::Update => {
                if let Err(err) = self
                    .defaults
                    .apply_update(event.table, event.id, &mut event.changed_fields)
                    .await
                {
                    error!(
                        record_id = %event.id,
                        table = event.table.name(),
                        error = %err,
                        "field defaulting failed"
                    );
                }
            }
            MutationKind::Move | MutationKind::Delete | MutationKind::Undelete => {}
        }
    }

    /// Post-commit hook: reconcile the search index with the mutation.
    ///
    /// Only post-phase events on the document table are watched. The
    /// returned outcome is terminal for the event; errors are carried
    /// inside it, never raised.
    pub async fn handle_post(&self, event: &MutationEvent) -> SyncOutcome {
        if event.phase != HookPhase::Post || event.table != RecordTable::Documents {
            return SyncOutcome::Skipped(SkipReason::NotWatched);
        }

        let state = match self.document_state_for(event).await {
            Ok(state) => state,
            Err(err) => {
                error!(document_id = %event.id, error = %err, "record store lookup failed");
                return SyncOutcome::Failed(err);
            }
        };

        let action = classify(event, state.as_ref());
        if action.is_noop() {
            return SyncOutcome::Skipped(SkipReason::NoAction);
        }

        let core = match self.resolver.resolve(event.id).await {
            Ok(Some(core)) => core,
            Ok(None) => {
                warn!(document_id = %event.id, "no index core resolved, dropping event");
                return SyncOutcome::Skipped(SkipReason::CoreNotResolved);
            }
            Err(err) => {
                error!(document_id = %event.id, error = %err, "record store lookup failed");
                return SyncOutcome::Failed(err);
            }
        };

        match self.executor.execute(&action, &core).await {
            Ok(outcome) => outcome,
            Err(err @ SyncError::MaterializationNotReady { .. }) => {
                warn!(
                    document_id = %event.id,
                    core = %core.name,
                    error = %err,
                    "failed to reindex document"
                );
                SyncOutcome::Failed(err)
            }
            Err(err) => {
                error!(
                    document_id = %event.id,
                    core = %core.name,
                    error = %err,
                    "reconciliation failed"
                );
                SyncOutcome::Failed(err)
            }
        }
    }

    /// Fetch current document state when the classifier will need it:
    /// an update touching `collections` but not `hidden` has to settle
    /// the hidden question from the store.
    async fn document_state_for(&self, event: &MutationEvent) -> Result<Option<DocumentState>> {
        if event.kind == MutationKind::Update
            && event.changes_index_fields()
            && !event.changes_field("hidden")
        {
            self.store.document_state(event.id).await
        } else {
            Ok(None)
        }
    }

    async fn provision_new_core(&self, event: &mut MutationEvent) {
        let Some(provisioner) = &self.provisioner else {
            warn!("no core provisioner configured, leaving new core row as submitted");
            return;
        };

        match provisioner.provision_core().await {
            Ok(name) => {
                event
                    .changed_fields
                    .insert("index_name".to_string(), Value::from(name));
            }
            Err(err) => {
                error!(error = %err, "could not create search core, rejecting registry row");
                event.changed_fields.clear();
            }
        }
    }
}
