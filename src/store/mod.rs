//! Versioned state store contract with optimistic concurrency (§4.7).
//!
//! An activation's state lives here, not in the activation itself: the
//! activation loads on activate, caches `(payload, version)`, and saves with
//! that cached version as `expected_version`. The store only guarantees an
//! atomic compare-and-swap; merge-or-abort on conflict is the activation's
//! choice (§4.7).

pub mod error;
pub mod in_memory;
pub mod record;
pub mod traits;

pub use error::StoreError;
pub use in_memory::InMemoryStateStore;
pub use record::StateRecord;
pub use traits::StateStore;
