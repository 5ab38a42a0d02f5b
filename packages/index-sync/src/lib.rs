//! Record-to-Index Synchronization Engine
//!
//! Keeps a Solr search index consistent with a source-of-truth
//! document table. The engine observes the host system's record
//! mutations (insert, update, move, delete, undelete), classifies each
//! one, and issues idempotent reconciliation operations against the
//! document's index core: delete-by-id, or materialize-and-upsert,
//! each followed by a synchronous commit.
//!
//! # Design
//!
//! - The source table always wins: a search-side failure is logged and
//!   reported, never raised into the host's transaction.
//! - One action per event, decided by a pure classifier; no state is
//!   carried between events and nothing is queued or retried.
//! - The index never holds a hidden or deleted document, and never a
//!   partial one: a document that fails to materialize leaves the
//!   previous index state untouched.
//! - External seams (record store, search service, materializer) are
//!   traits, so the whole engine runs against in-memory fakes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use index_sync::testing::MockMaterializer;
//! use index_sync::{
//!     EventDispatcher, MemoryRecordStore, MutationEvent, MutationKind, RecordTable,
//!     SolrSearchIndex,
//! };
//! use solr_client::{SolrClient, SolrConfig};
//!
//! let store = Arc::new(MemoryRecordStore::new());
//! let search = Arc::new(SolrSearchIndex::new(SolrClient::new(&SolrConfig::new())?));
//! let materializer = Arc::new(MockMaterializer::new());
//!
//! let dispatcher = EventDispatcher::new(store, search, materializer);
//!
//! // Host reports: document 42 was just hidden.
//! let event = MutationEvent::post(MutationKind::Update, RecordTable::Documents, 42)
//!     .with_field("hidden", 1);
//! let outcome = dispatcher.handle_post(&event).await;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Events, actions, documents, cores
//! - [`traits`] - External seams (record store, search service, materializer)
//! - [`classifier`] - Event classification (pure)
//! - [`resolver`] - Document-to-core resolution
//! - [`executor`] - Action execution with commit semantics
//! - [`dispatcher`] - The host-facing hook surface
//! - [`defaults`] - Pre-commit field defaulting
//! - [`provision`] - Search-core provisioning
//! - [`solr`] - Solr-backed search service implementation
//! - [`stores`] - Record store implementations (memory, Postgres)
//! - [`testing`] - Mock implementations for testing

pub mod classifier;
pub mod defaults;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod provision;
pub mod resolver;
pub mod solr;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{Result, SyncError};
pub use traits::{
    materializer::{DocumentMaterializer, Materialized},
    search::{CoreAdmin, SearchIndex},
    store::{CoreRegistry, DocumentStore, MetadataIndexFlags, MetadataStore, RecordStore},
};
pub use types::{
    action::{ReconciliationAction, SkipReason, SyncOutcome},
    core::{CoreId, IndexCore},
    document::{DocumentState, IndexableDocument, RecordId},
    event::{HookPhase, MutationEvent, MutationKind, RecordTable},
};

// Re-export the engine components
pub use classifier::classify;
pub use defaults::FieldDefaults;
pub use dispatcher::EventDispatcher;
pub use executor::ReconciliationExecutor;
pub use provision::{CoreProvisioner, ProvisionConfig};
pub use resolver::CoreResolver;
pub use solr::SolrSearchIndex;

// Re-export stores
pub use stores::MemoryRecordStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresRecordStore;
