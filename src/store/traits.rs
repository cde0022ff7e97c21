//! Generic state store trait (§4.7, §6 state store contract).

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::error::StoreError;
use super::record::StateRecord;

/// Per-namespace versioned key-value contract with optimistic concurrency.
///
/// Generic over the payload type `T`, not `dyn`: each storage namespace is
/// monomorphized for the actor state shape it holds.
#[async_trait]
pub trait StateStore<T: Send + Sync + Default + Clone + 'static>: Send + Sync {
    /// Load `key`, or `(T::default(), 0)` if it has never been saved.
    async fn load(&self, key: &str) -> Result<StateRecord<T>, StoreError>;

    /// Compare-and-swap: succeeds only if the stored version equals
    /// `expected_version`, in which case the new version is `expected_version + 1`.
    async fn save(&self, key: &str, payload: T, expected_version: u64) -> Result<u64, StoreError>;

    /// Delete `key` under the same optimistic-concurrency precondition as `save`.
    async fn delete(&self, key: &str, expected_version: u64) -> Result<(), StoreError>;
}
