//! State store error types (§4.7, §7 `ConcurrencyFailure`).

// Layer 2: Third-party crate imports
use thiserror::Error;

/// Errors raised by a [`super::traits::StateStore`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `Save`/`Delete` was called with a stale `expected_version` (§7 `ConcurrencyFailure`).
    #[error("concurrency failure on {key}: expected version {expected}, actual {actual}")]
    ConcurrencyFailure {
        key: String,
        expected: u64,
        actual: u64,
    },

    /// The underlying storage backend failed for a reason unrelated to versioning.
    #[error("storage backend error for {key}: {reason}")]
    Backend { key: String, reason: String },
}
