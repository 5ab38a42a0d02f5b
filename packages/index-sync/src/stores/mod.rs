//! Record store implementations.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryRecordStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresRecordStore;
