//! Trait abstractions at the engine's external seams.

pub mod materializer;
pub mod search;
pub mod store;

pub use materializer::{DocumentMaterializer, Materialized};
pub use search::{CoreAdmin, SearchIndex};
pub use store::{CoreRegistry, DocumentStore, MetadataIndexFlags, MetadataStore, RecordStore};
