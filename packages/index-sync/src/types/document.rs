//! Document-side types: record ids, visibility state, and the
//! materialized indexable representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a row in one of the host's record tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Read-only visibility state of a document row.
///
/// The engine never writes document rows; this is what it reads back
/// after the host committed a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentState {
    pub hidden: bool,
}

/// The full indexable representation of a document, as produced by a
/// [`DocumentMaterializer`](crate::traits::DocumentMaterializer).
///
/// Fields are a flat map of index field name to value. The `uid` field
/// always holds the record id; delete-by-id operations are scoped to it
/// and the search service upserts on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexableDocument {
    pub id: RecordId,
    pub fields: Map<String, Value>,
}

impl IndexableDocument {
    /// Create a document for a record, seeding the `uid` field.
    pub fn new(id: impl Into<RecordId>) -> Self {
        let id = id.into();
        let mut fields = Map::new();
        fields.insert("uid".to_string(), Value::from(id.0));
        Self { id, fields }
    }

    /// Add an index field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up an index field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_document_carries_uid_field() {
        let doc = IndexableDocument::new(42).with_field("title", "Chronicle");

        assert_eq!(doc.id, RecordId(42));
        assert_eq!(doc.field("uid"), Some(&json!(42)));
        assert_eq!(doc.field("title"), Some(&json!("Chronicle")));
    }
}
