//! The actor directory itself (§4.3).

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use tracing::debug;

// Layer 3: Internal module imports
use super::migration::MigrationOverride;
use crate::ring::ConsistentHashRing;
use crate::util::{ActorKey, SiloId};

/// Resolves an [`ActorKey`] to its owning silo: the ring's answer, unless a
/// sticky migration override is present and unexpired (§4.3).
pub struct ActorDirectory {
    ring: Arc<ConsistentHashRing>,
    overrides: DashMap<ActorKey, MigrationOverride>,
}

impl ActorDirectory {
    /// Build a directory backed by `ring`.
    pub fn new(ring: Arc<ConsistentHashRing>) -> Self {
        Self {
            ring,
            overrides: DashMap::new(),
        }
    }

    /// Resolve the current owner of `key`: the override target if one is
    /// present and unexpired, otherwise `Ring.Lookup(key.routing_key())`.
    pub fn owner_of(&self, key: &ActorKey) -> Option<SiloId> {
        if let Some(entry) = self.overrides.get(key) {
            if !entry.is_expired() {
                return Some(entry.target_silo.clone());
            }
        }
        self.ring.lookup(&key.routing_key())
    }

    /// Whether `self_silo` currently owns `key`.
    pub fn is_local(&self, key: &ActorKey, self_silo: &SiloId) -> bool {
        self.owner_of(key).as_ref() == Some(self_silo)
    }

    /// Write a sticky override for `key`, pinning it to `target_silo` for the
    /// migration's duration. Overwrites any existing override for the same key.
    pub fn set_override(&self, key: ActorKey, target_silo: SiloId, ttl: std::time::Duration) {
        debug!(actor = %key, target = %target_silo, "migration override set");
        self.overrides.insert(key, MigrationOverride::new(target_silo, ttl));
    }

    /// Remove `key`'s override once the migration completes, making the ring
    /// authoritative again.
    pub fn clear_override(&self, key: &ActorKey) {
        self.overrides.remove(key);
    }

    /// Drop every expired override. Not required for correctness (expired
    /// overrides are already ignored by `owner_of`) but keeps the map from
    /// growing unbounded across many migrations.
    pub fn sweep_expired_overrides(&self) {
        self.overrides.retain(|_, ov| !ov.is_expired());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::TypeId;

    fn key() -> ActorKey {
        ActorKey::new(TypeId::new("Counter"), "c1")
    }

    #[test]
    fn owner_of_follows_the_ring_without_an_override() {
        let ring = Arc::new(ConsistentHashRing::new(50));
        ring.insert(SiloId::new("silo-A"));
        let directory = ActorDirectory::new(ring);

        assert_eq!(directory.owner_of(&key()), Some(SiloId::new("silo-A")));
    }

    #[test]
    fn override_takes_priority_over_the_ring() {
        let ring = Arc::new(ConsistentHashRing::new(50));
        ring.insert(SiloId::new("silo-A"));
        let directory = ActorDirectory::new(ring);

        directory.set_override(key(), SiloId::new("silo-B"), std::time::Duration::from_secs(30));
        assert_eq!(directory.owner_of(&key()), Some(SiloId::new("silo-B")));
    }

    #[test]
    fn expired_override_is_ignored() {
        let ring = Arc::new(ConsistentHashRing::new(50));
        ring.insert(SiloId::new("silo-A"));
        let directory = ActorDirectory::new(ring);

        directory.set_override(key(), SiloId::new("silo-B"), std::time::Duration::from_millis(0));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(directory.owner_of(&key()), Some(SiloId::new("silo-A")));
    }

    #[test]
    fn clear_override_restores_ring_authority() {
        let ring = Arc::new(ConsistentHashRing::new(50));
        ring.insert(SiloId::new("silo-A"));
        let directory = ActorDirectory::new(ring);

        directory.set_override(key(), SiloId::new("silo-B"), std::time::Duration::from_secs(30));
        directory.clear_override(&key());
        assert_eq!(directory.owner_of(&key()), Some(SiloId::new("silo-A")));
    }

    #[test]
    fn is_local_matches_owner_of() {
        let ring = Arc::new(ConsistentHashRing::new(50));
        ring.insert(SiloId::new("silo-A"));
        let directory = ActorDirectory::new(ring);

        assert!(directory.is_local(&key(), &SiloId::new("silo-A")));
        assert!(!directory.is_local(&key(), &SiloId::new("silo-B")));
    }
}
