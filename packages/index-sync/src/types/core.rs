//! Search-index partitions ("cores") and their identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a core row in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoreId(pub i64);

impl From<i64> for CoreId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One search-index partition a document belongs to.
///
/// `name` is the core name used in search-service request paths,
/// e.g. `docCore3`. Resolved by joining the document row to its core
/// reference; owned by the external record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCore {
    pub id: CoreId,
    pub name: String,
}

impl IndexCore {
    pub fn new(id: impl Into<CoreId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
