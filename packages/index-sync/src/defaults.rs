//! Pre-commit field defaulting.
//!
//! Adjusts a mutation's field map before the host writes it, the way
//! the host's own form layer would have: sorting fields default from
//! titles, index names and labels default from each other, and derived
//! index-control flags stay consistent with the flags they derive
//! from. Never touches the search index.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::error::Result;
use crate::traits::store::MetadataStore;
use crate::types::document::RecordId;
use crate::types::event::{is_empty_value, is_truthy, RecordTable};

/// Applies pre-commit defaulting rules per table and mutation status.
#[derive(Clone)]
pub struct FieldDefaults {
    store: Arc<dyn MetadataStore>,
}

impl FieldDefaults {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Defaulting rules for a new record.
    pub fn apply_insert(&self, table: RecordTable, fields: &mut Map<String, Value>) {
        match table {
            RecordTable::Documents => {
                // Set sorting field if empty.
                if is_empty_value(fields.get("title_sorting")) {
                    if let Some(title) = fields.get("title").filter(|t| is_truthy(t)).cloned() {
                        fields.insert("title_sorting".to_string(), title);
                    }
                }
            }
            RecordTable::Metadata => {
                // Store the field in the index if it appears in lists.
                if fields.get("is_listed").is_some_and(is_truthy) {
                    fields.insert("index_stored".to_string(), Value::from(1));
                }
                // Index the field if it feeds auto-completion.
                if fields.get("index_autocomplete").is_some_and(is_truthy) {
                    fields.insert("index_indexed".to_string(), Value::from(1));
                }
                normalize_index_name(fields);
            }
            RecordTable::Collections | RecordTable::Libraries | RecordTable::Structures => {
                normalize_index_name(fields);
            }
            RecordTable::SolrCores => {}
        }
    }

    /// Defaulting rules for an updated record.
    ///
    /// Metadata flag resets consult the stored row, so this one is
    /// async and can fail on a storage error.
    pub async fn apply_update(
        &self,
        table: RecordTable,
        id: RecordId,
        fields: &mut Map<String, Value>,
    ) -> Result<()> {
        match table {
            RecordTable::Metadata => {
                self.reconcile_metadata_flags(id, fields).await?;
                guard_index_name(table, id, fields);
            }
            RecordTable::Structures => guard_index_name(table, id, fields),
            _ => {}
        }
        Ok(())
    }

    /// Keep derived metadata flags consistent on update.
    ///
    /// A truthy source flag forces its derived flag on. A derived flag
    /// cleared *without* its source flag in the same mutation is reset
    /// to what the source flag currently says in the store, so a form
    /// that only submits the derived column cannot silently disable
    /// listing or auto-completion.
    async fn reconcile_metadata_flags(
        &self,
        id: RecordId,
        fields: &mut Map<String, Value>,
    ) -> Result<()> {
        if fields.get("is_listed").is_some_and(is_truthy) {
            fields.insert("index_stored".to_string(), Value::from(1));
        }
        if fields.get("index_autocomplete").is_some_and(is_truthy) {
            fields.insert("index_indexed".to_string(), Value::from(1));
        }

        let reset_stored = cleared_without_source(fields, "index_stored", "is_listed");
        let reset_indexed = cleared_without_source(fields, "index_indexed", "index_autocomplete");
        if !reset_stored && !reset_indexed {
            return Ok(());
        }

        if let Some(flags) = self.store.metadata_index_flags(id).await? {
            if reset_stored {
                fields.insert("index_stored".to_string(), flag_value(flags.is_listed));
            }
            if reset_indexed {
                fields.insert("index_indexed".to_string(), flag_value(flags.index_autocomplete));
            }
        }
        Ok(())
    }
}

/// Whether `derived` is being cleared while `source` is absent from
/// the same mutation.
fn cleared_without_source(fields: &Map<String, Value>, derived: &str, source: &str) -> bool {
    matches!(fields.get(derived), Some(value) if !is_truthy(value)) && !fields.contains_key(source)
}

fn flag_value(on: bool) -> Value {
    Value::from(if on { 1 } else { 0 })
}

/// Shared index-name normalization for new rows.
fn normalize_index_name(fields: &mut Map<String, Value>) {
    // Set label as index name if empty.
    if is_empty_value(fields.get("index_name")) {
        if let Some(label) = fields.get("label").filter(|l| is_truthy(l)).cloned() {
            fields.insert("index_name".to_string(), label);
        }
    }
    // Set index name as label if empty.
    if is_empty_value(fields.get("label")) {
        if let Some(index_name) = fields.get("index_name").filter(|n| is_truthy(n)).cloned() {
            fields.insert("label".to_string(), index_name);
        }
    }
    // Ensure index names don't get mixed up with sorting values.
    if let Some(Value::String(name)) = fields.get_mut("index_name") {
        if name.ends_with("_sorting") {
            name.push('0');
        }
    }
}

/// The index name must not change in production: drop the changed
/// value, or reject the whole mutation if it changed nothing else.
fn guard_index_name(table: RecordTable, id: RecordId, fields: &mut Map<String, Value>) {
    if !fields.contains_key("index_name") {
        return;
    }
    if fields.len() < 2 {
        fields.clear();
    } else {
        fields.remove("index_name");
    }
    info!(
        record_id = %id,
        table = table.name(),
        "prevented index name change"
    );
}
