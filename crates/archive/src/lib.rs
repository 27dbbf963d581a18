//! Picklist Archive - deduplicating, searchable store of loaded orders.
//!
//! Every successful load writes an immutable copy of its orders here, keyed
//! by the composite `(order_number, sku, customer_name)` identity. The store
//! is `SQLite` on disk (in-memory in tests); schema setup is lazy.
//!
//! Archiving is best-effort from the picking workflow's perspective: callers
//! log failures and never abort a load over them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod model;
pub mod store;

pub use error::RepositoryError;
pub use model::{ArchiveStats, ArchivedOrder, LocalImageSource};
pub use store::{ArchiveIndex, RETENTION_DAYS, create_pool};
