//! Mutation classification.
//!
//! Decides what a record mutation means for the search index. Pure and
//! synchronous: the decision depends only on the event and the current
//! document state passed in, never on I/O or state carried between
//! events.

use crate::types::action::ReconciliationAction;
use crate::types::document::DocumentState;
use crate::types::event::{is_truthy, MutationEvent, MutationKind, RecordTable};

/// Classify a mutation event into a reconciliation action.
///
/// Rules, per event kind:
/// - `Insert`: never an index action. A new document is not indexed
///   until a later update marks it visible, mirroring the host's
///   update cycle.
/// - `Update`: relevant only if `hidden` or `collections` is among the
///   changed fields. If the resulting state is hidden, the document
///   leaves the index; otherwise it is reindexed.
/// - `Move`: the document leaves the index. A relocation does not
///   change content, so no reindex follows.
/// - `Delete`: the document leaves the index (terminal).
/// - `Undelete`: the document is reindexed unconditionally.
///
/// `state` is the document's post-write store state, used to settle
/// the hidden question when an update touched `collections` but not
/// `hidden`. A changed `hidden` field always wins over `state`, so the
/// classification stays deterministic even when the two disagree.
///
/// Events for tables other than `documents` never produce an action.
pub fn classify(event: &MutationEvent, state: Option<&DocumentState>) -> ReconciliationAction {
    if event.table != RecordTable::Documents {
        return ReconciliationAction::NoOp;
    }

    match event.kind {
        MutationKind::Insert => ReconciliationAction::NoOp,
        MutationKind::Update => {
            if !event.changes_index_fields() {
                return ReconciliationAction::NoOp;
            }
            let hidden = match event.changed_field("hidden") {
                Some(value) => is_truthy(value),
                None => state.is_some_and(|s| s.hidden),
            };
            if hidden {
                ReconciliationAction::DeleteFromIndex { id: event.id }
            } else {
                ReconciliationAction::AddOrUpdateIndex { id: event.id }
            }
        }
        MutationKind::Move | MutationKind::Delete => {
            ReconciliationAction::DeleteFromIndex { id: event.id }
        }
        MutationKind::Undelete => ReconciliationAction::AddOrUpdateIndex { id: event.id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::RecordId;

    fn update(id: i64) -> MutationEvent {
        MutationEvent::post(MutationKind::Update, RecordTable::Documents, id)
    }

    #[test]
    fn insert_is_never_an_index_action() {
        let event = MutationEvent::post(MutationKind::Insert, RecordTable::Documents, 1)
            .with_field("hidden", 0)
            .with_field("title", "new document");

        assert_eq!(classify(&event, None), ReconciliationAction::NoOp);
    }

    #[test]
    fn update_without_index_fields_is_noop() {
        let event = update(1).with_field("title", "renamed");

        assert_eq!(classify(&event, None), ReconciliationAction::NoOp);
    }

    #[test]
    fn update_hiding_a_document_deletes_it() {
        let event = update(42).with_field("hidden", 1);

        assert_eq!(
            classify(&event, None),
            ReconciliationAction::DeleteFromIndex { id: RecordId(42) }
        );
    }

    #[test]
    fn update_unhiding_a_document_reindexes_it() {
        let event = update(42).with_field("hidden", 0);

        assert_eq!(
            classify(&event, Some(&DocumentState { hidden: true })),
            ReconciliationAction::AddOrUpdateIndex { id: RecordId(42) }
        );
    }

    #[test]
    fn string_flags_from_host_forms_are_understood() {
        let hide = update(5).with_field("hidden", "1");
        let show = update(5).with_field("hidden", "0");

        assert_eq!(
            classify(&hide, None),
            ReconciliationAction::DeleteFromIndex { id: RecordId(5) }
        );
        assert_eq!(
            classify(&show, None),
            ReconciliationAction::AddOrUpdateIndex { id: RecordId(5) }
        );
    }

    #[test]
    fn collections_change_falls_back_to_store_state() {
        let event = update(8).with_field("collections", "1,4");

        // Hidden in the store: the index entry must go.
        assert_eq!(
            classify(&event, Some(&DocumentState { hidden: true })),
            ReconciliationAction::DeleteFromIndex { id: RecordId(8) }
        );
        // Visible in the store: content changed, reindex.
        assert_eq!(
            classify(&event, Some(&DocumentState { hidden: false })),
            ReconciliationAction::AddOrUpdateIndex { id: RecordId(8) }
        );
        // No state at all: treat as visible.
        assert_eq!(
            classify(&event, None),
            ReconciliationAction::AddOrUpdateIndex { id: RecordId(8) }
        );
    }

    #[test]
    fn changed_hidden_field_wins_over_store_state() {
        let event = update(8).with_field("hidden", 1);

        assert_eq!(
            classify(&event, Some(&DocumentState { hidden: false })),
            ReconciliationAction::DeleteFromIndex { id: RecordId(8) }
        );
    }

    #[test]
    fn move_and_delete_remove_the_document() {
        for kind in [MutationKind::Move, MutationKind::Delete] {
            let event = MutationEvent::post(kind, RecordTable::Documents, 9);
            assert_eq!(
                classify(&event, None),
                ReconciliationAction::DeleteFromIndex { id: RecordId(9) }
            );
        }
    }

    #[test]
    fn undelete_always_reindexes() {
        let event = MutationEvent::post(MutationKind::Undelete, RecordTable::Documents, 7);

        assert_eq!(
            classify(&event, None),
            ReconciliationAction::AddOrUpdateIndex { id: RecordId(7) }
        );
    }

    #[test]
    fn other_tables_are_ignored() {
        let event = MutationEvent::post(MutationKind::Update, RecordTable::Metadata, 3)
            .with_field("hidden", 1);

        assert_eq!(classify(&event, None), ReconciliationAction::NoOp);
    }
}
