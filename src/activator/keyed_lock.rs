//! Striped keyed lock guaranteeing at-most-one-activation per key (§4.5).
//!
//! Two concurrent `local_dispatch` calls for the same [`crate::util::ActorKey`]
//! must not both construct an actor. Rather than one lock per key (unbounded
//! growth) or one global lock (serializes unrelated keys), activations hash
//! onto a fixed number of stripes, each guarded by its own async mutex.

// Layer 1: Standard library imports
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// Layer 2: Third-party crate imports
use tokio::sync::{Mutex, MutexGuard};

// Layer 3: Internal module imports
use crate::util::ActorKey;

/// Number of stripes in an [`ActivationLockStripes`] table.
pub const DEFAULT_STRIPE_COUNT: usize = 256;

/// A fixed-size table of mutexes, one per stripe, indexed by actor key hash.
///
/// Holding the guard returned by [`Self::lock`] for a key serializes
/// activation attempts for that key (and, as a side effect, for any other
/// key that happens to hash to the same stripe).
pub struct ActivationLockStripes {
    stripes: Vec<Mutex<()>>,
}

impl ActivationLockStripes {
    /// Build a table with `stripe_count` stripes.
    pub fn new(stripe_count: usize) -> Self {
        let stripe_count = stripe_count.max(1);
        let stripes = (0..stripe_count).map(|_| Mutex::new(())).collect();
        Self { stripes }
    }

    fn stripe_index(&self, key: &ActorKey) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.stripes.len()
    }

    /// Acquire the stripe guarding `key`. Holding the returned guard blocks
    /// any other task locking a key hashing to the same stripe.
    pub async fn lock(&self, key: &ActorKey) -> MutexGuard<'_, ()> {
        let index = self.stripe_index(key);
        self.stripes[index].lock().await
    }
}

impl Default for ActivationLockStripes {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPE_COUNT)
    }
}
