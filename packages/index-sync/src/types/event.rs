//! Mutation events delivered by the host record system.
//!
//! Events are immutable values created by the host on each record
//! mutation and consumed synchronously by the dispatcher. They are
//! never persisted. The field map carries loosely-typed values exactly
//! as the host hands them over (integers, `"0"`/`"1"` strings, empty
//! strings), so truthiness helpers here follow the host's loose rules.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::document::RecordId;

/// Which hook call site delivered the event.
///
/// `Pre` runs before the record write and may adjust the field map;
/// `Post` runs after the write committed and drives reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    Pre,
    Post,
}

/// The kind of record mutation the host performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Insert,
    Update,
    Move,
    Delete,
    Undelete,
}

/// The record tables the engine knows about.
///
/// Only [`Documents`](RecordTable::Documents) is index-relevant; the
/// others participate in pre-commit field defaulting and provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTable {
    Documents,
    Metadata,
    Collections,
    Libraries,
    Structures,
    SolrCores,
}

impl RecordTable {
    /// Parse a host table name. Unknown tables return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "documents" => Some(Self::Documents),
            "metadata" => Some(Self::Metadata),
            "collections" => Some(Self::Collections),
            "libraries" => Some(Self::Libraries),
            "structures" => Some(Self::Structures),
            "solr_cores" => Some(Self::SolrCores),
            _ => None,
        }
    }

    /// The host-side table name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Metadata => "metadata",
            Self::Collections => "collections",
            Self::Libraries => "libraries",
            Self::Structures => "structures",
            Self::SolrCores => "solr_cores",
        }
    }
}

/// One record mutation as reported by the host.
///
/// `changed_fields` holds only the fields this mutation touched, keyed
/// by column name. It may be empty for `Move`, `Delete` and `Undelete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationEvent {
    pub phase: HookPhase,
    pub kind: MutationKind,
    pub table: RecordTable,
    pub id: RecordId,
    #[serde(default)]
    pub changed_fields: Map<String, Value>,
}

impl MutationEvent {
    /// Build a pre-commit event.
    pub fn pre(kind: MutationKind, table: RecordTable, id: impl Into<RecordId>) -> Self {
        Self {
            phase: HookPhase::Pre,
            kind,
            table,
            id: id.into(),
            changed_fields: Map::new(),
        }
    }

    /// Build a post-commit event.
    pub fn post(kind: MutationKind, table: RecordTable, id: impl Into<RecordId>) -> Self {
        Self {
            phase: HookPhase::Post,
            kind,
            table,
            id: id.into(),
            changed_fields: Map::new(),
        }
    }

    /// Add a changed field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.changed_fields.insert(name.into(), value.into());
        self
    }

    /// The new value of a changed field, if this mutation touched it.
    pub fn changed_field(&self, name: &str) -> Option<&Value> {
        self.changed_fields.get(name)
    }

    /// Whether this mutation touched the named field at all, regardless
    /// of the value it was set to.
    pub fn changes_field(&self, name: &str) -> bool {
        self.changed_fields.contains_key(name)
    }

    /// Whether this mutation touched a field that affects index
    /// membership (`hidden`) or index content (`collections`).
    pub fn changes_index_fields(&self) -> bool {
        self.changes_field("hidden") || self.changes_field("collections")
    }

    /// Whether the named changed field holds a truthy value.
    pub fn field_is_truthy(&self, name: &str) -> bool {
        self.changed_field(name).is_some_and(is_truthy)
    }
}

/// Host-style truthiness for a field value.
///
/// `null`, `false`, `0`, `""`, `"0"` and empty collections are falsy;
/// everything else is truthy. Matches how the host evaluates its
/// loosely-typed form values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Whether a field value counts as unset: missing entirely, or falsy.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    !value.is_some_and(is_truthy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_follows_host_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!([])));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("1")));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!([1])));
    }

    #[test]
    fn missing_fields_are_empty() {
        let event = MutationEvent::post(MutationKind::Update, RecordTable::Documents, 1)
            .with_field("hidden", 0);

        assert!(is_empty_value(event.changed_field("hidden")));
        assert!(is_empty_value(event.changed_field("collections")));
        assert!(event.changes_field("hidden"));
        assert!(!event.changes_field("collections"));
    }

    #[test]
    fn index_fields_cover_hidden_and_collections() {
        let hidden = MutationEvent::post(MutationKind::Update, RecordTable::Documents, 1)
            .with_field("hidden", 1);
        let collections = MutationEvent::post(MutationKind::Update, RecordTable::Documents, 1)
            .with_field("collections", "3,5");
        let title = MutationEvent::post(MutationKind::Update, RecordTable::Documents, 1)
            .with_field("title", "renamed");

        assert!(hidden.changes_index_fields());
        assert!(collections.changes_index_fields());
        assert!(!title.changes_index_fields());
    }

    #[test]
    fn table_names_round_trip() {
        for table in [
            RecordTable::Documents,
            RecordTable::Metadata,
            RecordTable::Collections,
            RecordTable::Libraries,
            RecordTable::Structures,
            RecordTable::SolrCores,
        ] {
            assert_eq!(RecordTable::from_name(table.name()), Some(table));
        }
        assert_eq!(RecordTable::from_name("pages"), None);
    }
}
