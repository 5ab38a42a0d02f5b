//! Reconciliation actions and per-event outcomes.

use crate::error::SyncError;
use crate::types::core::IndexCore;
use crate::types::document::RecordId;

/// What a classified mutation event means for the search index.
///
/// Exactly one action is produced per event, as a pure function of the
/// event kind, the changed fields and the current record state. The
/// target core is attached later, at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationAction {
    /// The event does not affect the index.
    NoOp,
    /// Remove the document from its core.
    DeleteFromIndex { id: RecordId },
    /// Materialize the document and upsert it into its core.
    AddOrUpdateIndex { id: RecordId },
}

impl ReconciliationAction {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

/// Why a post-phase event was dropped without touching the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Wrong table or wrong phase for reconciliation.
    NotWatched,
    /// Classified as `NoOp`.
    NoAction,
    /// No index core could be resolved for the document.
    CoreNotResolved,
}

/// Terminal state of one post-phase mutation event.
///
/// `Failed` carries the error for inspection, but the dispatcher never
/// propagates it: a search-side failure must not abort the host's
/// record write.
#[derive(Debug)]
pub enum SyncOutcome {
    Skipped(SkipReason),
    Deleted { id: RecordId, core: IndexCore },
    Indexed { id: RecordId, core: IndexCore },
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The error carried by a `Failed` outcome.
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}
