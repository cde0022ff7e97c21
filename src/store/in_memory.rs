//! Reference in-memory state store implementation (§6: "the core supplies an
//! in-memory reference implementation for tests").

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use dashmap::DashMap;

// Layer 3: Internal module imports
use super::error::StoreError;
use super::record::StateRecord;
use super::traits::StateStore;

/// Lock-free in-memory implementation of [`StateStore`], backed by a DashMap
/// keyed by the caller-supplied string key (typically `ActorKey::routing_key()`).
pub struct InMemoryStateStore<T> {
    entries: DashMap<String, (T, u64)>,
}

impl<T> InMemoryStateStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T> Default for InMemoryStateStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + Sync + Default + Clone + 'static> StateStore<T> for InMemoryStateStore<T> {
    async fn load(&self, key: &str) -> Result<StateRecord<T>, StoreError> {
        match self.entries.get(key) {
            Some(entry) => {
                let (payload, version) = entry.value().clone();
                Ok(StateRecord::new(payload, version))
            }
            None => Ok(StateRecord::default()),
        }
    }

    async fn save(&self, key: &str, payload: T, expected_version: u64) -> Result<u64, StoreError> {
        let actual_version = self.entries.get(key).map(|e| e.value().1).unwrap_or(0);
        if actual_version != expected_version {
            return Err(StoreError::ConcurrencyFailure {
                key: key.to_string(),
                expected: expected_version,
                actual: actual_version,
            });
        }

        let new_version = expected_version + 1;
        self.entries.insert(key.to_string(), (payload, new_version));
        Ok(new_version)
    }

    async fn delete(&self, key: &str, expected_version: u64) -> Result<(), StoreError> {
        let actual_version = self.entries.get(key).map(|e| e.value().1).unwrap_or(0);
        if actual_version != expected_version {
            return Err(StoreError::ConcurrencyFailure {
                key: key.to_string(),
                expected: expected_version,
                actual: actual_version,
            });
        }
        self.entries.remove(key);
        Ok(())
    }
}
