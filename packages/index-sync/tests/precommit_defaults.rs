//! Integration tests for the pre-commit hook: field defaulting and
//! search-core provisioning, driven through the dispatcher the way
//! the host delivers its pre-phase notifications.

use std::sync::Arc;

use serde_json::json;

use index_sync::testing::{MockMaterializer, MockSearchIndex};
use index_sync::{
    CoreProvisioner, EventDispatcher, MemoryRecordStore, MutationEvent, MutationKind,
    ProvisionConfig, RecordTable,
};

fn engine(store: &Arc<MemoryRecordStore>) -> EventDispatcher {
    EventDispatcher::new(
        store.clone(),
        Arc::new(MockSearchIndex::new()),
        Arc::new(MockMaterializer::new()),
    )
}

fn engine_with_admin(
    store: &Arc<MemoryRecordStore>,
    admin: &Arc<MockSearchIndex>,
) -> EventDispatcher {
    EventDispatcher::new(
        store.clone(),
        admin.clone(),
        Arc::new(MockMaterializer::new()),
    )
    .with_provisioner(CoreProvisioner::new(admin.clone(), store.clone()))
}

#[tokio::test]
async fn test_new_documents_get_a_sorting_title() {
    let store = Arc::new(MemoryRecordStore::new());
    let mut event = MutationEvent::pre(MutationKind::Insert, RecordTable::Documents, 0)
        .with_field("title", "Chronicle of Saxony");

    engine(&store).handle_pre(&mut event).await;

    assert_eq!(
        event.changed_field("title_sorting"),
        Some(&json!("Chronicle of Saxony"))
    );
}

#[tokio::test]
async fn test_new_metadata_rows_are_normalized() {
    let store = Arc::new(MemoryRecordStore::new());
    let mut event = MutationEvent::pre(MutationKind::Insert, RecordTable::Metadata, 0)
        .with_field("label", "Author")
        .with_field("is_listed", 1);

    engine(&store).handle_pre(&mut event).await;

    assert_eq!(event.changed_field("index_stored"), Some(&json!(1)));
    assert_eq!(event.changed_field("index_name"), Some(&json!("Author")));
}

#[tokio::test]
async fn test_cleared_derived_flag_is_reset_from_the_row() {
    let store = Arc::new(MemoryRecordStore::new());
    store.insert_metadata(5, true, false);
    let mut event = MutationEvent::pre(MutationKind::Update, RecordTable::Metadata, 5)
        .with_field("index_stored", 0);

    engine(&store).handle_pre(&mut event).await;

    // is_listed is still on in the row, so the bare clear is undone.
    assert_eq!(event.changed_field("index_stored"), Some(&json!(1)));
}

#[tokio::test]
async fn test_index_name_changes_are_prevented_on_update() {
    let store = Arc::new(MemoryRecordStore::new());
    let mut lone_change = MutationEvent::pre(MutationKind::Update, RecordTable::Structures, 3)
        .with_field("index_name", "renamed");
    let mut mixed_change = MutationEvent::pre(MutationKind::Update, RecordTable::Metadata, 3)
        .with_field("index_name", "renamed")
        .with_field("label", "Chapter");

    let engine = engine(&store);
    engine.handle_pre(&mut lone_change).await;
    engine.handle_pre(&mut mixed_change).await;

    // A lone index_name change rejects the row outright; among other
    // fields only the index_name entry is dropped.
    assert!(lone_change.changed_fields.is_empty());
    assert!(!mixed_change.changes_field("index_name"));
    assert_eq!(mixed_change.changed_field("label"), Some(&json!("Chapter")));
}

#[tokio::test]
async fn test_new_core_rows_are_provisioned() {
    let store = Arc::new(MemoryRecordStore::new());
    store.insert_core(1, "docCore0");
    store.insert_core(2, "docCore1");
    let admin = Arc::new(MockSearchIndex::new());
    let mut event = MutationEvent::pre(MutationKind::Insert, RecordTable::SolrCores, 0)
        .with_field("label", "Third core");

    engine_with_admin(&store, &admin).handle_pre(&mut event).await;

    assert_eq!(event.changed_field("index_name"), Some(&json!("docCore2")));
    assert_eq!(admin.created_cores(), vec!["docCore2".to_string()]);
    // The rest of the row is left as submitted.
    assert_eq!(event.changed_field("label"), Some(&json!("Third core")));
}

#[tokio::test]
async fn test_failed_provisioning_rejects_the_core_row() {
    let store = Arc::new(MemoryRecordStore::new());
    let admin = Arc::new(MockSearchIndex::new().with_create_core_failure());
    let mut event = MutationEvent::pre(MutationKind::Insert, RecordTable::SolrCores, 0)
        .with_field("label", "Broken core");

    engine_with_admin(&store, &admin).handle_pre(&mut event).await;

    // An empty field map makes the host reject the record write, so a
    // core row never exists without a backing search core.
    assert!(event.changed_fields.is_empty());
}

#[tokio::test]
async fn test_provisioning_skips_names_taken_on_the_service() {
    let store = Arc::new(MemoryRecordStore::new());
    let admin = Arc::new(MockSearchIndex::new().with_existing_core("docCore0"));
    let mut event = MutationEvent::pre(MutationKind::Insert, RecordTable::SolrCores, 0);

    engine_with_admin(&store, &admin).handle_pre(&mut event).await;

    assert_eq!(event.changed_field("index_name"), Some(&json!("docCore1")));
}

#[tokio::test]
async fn test_provisioning_uses_the_configured_naming() {
    let store = Arc::new(MemoryRecordStore::new());
    let admin = Arc::new(MockSearchIndex::new());
    let engine = EventDispatcher::new(
        store.clone(),
        admin.clone(),
        Arc::new(MockMaterializer::new()),
    )
    .with_provisioner(
        CoreProvisioner::new(admin.clone(), store.clone()).with_config(
            ProvisionConfig::new()
                .with_core_prefix("archive")
                .with_config_set("archive_docs"),
        ),
    );
    let mut event = MutationEvent::pre(MutationKind::Insert, RecordTable::SolrCores, 0);

    engine.handle_pre(&mut event).await;

    assert_eq!(event.changed_field("index_name"), Some(&json!("archive0")));
    assert_eq!(
        admin.created_core_configs(),
        vec![("archive0".to_string(), "archive_docs".to_string())]
    );
}

#[tokio::test]
async fn test_without_a_provisioner_core_rows_pass_through() {
    let store = Arc::new(MemoryRecordStore::new());
    let mut event = MutationEvent::pre(MutationKind::Insert, RecordTable::SolrCores, 0)
        .with_field("index_name", "externalCore");

    engine(&store).handle_pre(&mut event).await;

    assert_eq!(
        event.changed_field("index_name"),
        Some(&json!("externalCore"))
    );
}

#[tokio::test]
async fn test_post_phase_events_are_ignored_by_the_pre_hook() {
    let store = Arc::new(MemoryRecordStore::new());
    let mut event = MutationEvent::post(MutationKind::Insert, RecordTable::Documents, 0)
        .with_field("title", "Chronicle");

    engine(&store).handle_pre(&mut event).await;

    assert!(!event.changes_field("title_sorting"));
}
