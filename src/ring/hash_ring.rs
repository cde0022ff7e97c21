//! A ring over 64-bit hashed positions with virtual nodes per silo (§4.2).

// Layer 1: Standard library imports
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;

// Layer 3: Internal module imports
use crate::util::SiloId;

/// Default number of virtual nodes minted per silo (§6 `VirtualNodesPerSilo`).
pub const DEFAULT_VIRTUAL_NODES_PER_SILO: usize = 150;

/// One virtual-node token on the ring: a hashed position plus the silo it
/// belongs to, so collisions break ties lexicographically by silo id.
#[derive(Debug, Clone)]
struct Token {
    position: u64,
    silo_id: SiloId,
}

/// An immutable ring layout. Membership changes build a new snapshot and
/// swap it in; readers never observe a partially-updated ring.
#[derive(Debug, Default)]
struct RingSnapshot {
    tokens: Vec<Token>,
}

impl RingSnapshot {
    fn lookup(&self, key: &str) -> Option<SiloId> {
        if self.tokens.is_empty() {
            return None;
        }
        let hash = hash_str(key);
        let idx = self
            .tokens
            .partition_point(|token| token.position < hash);
        let token = self.tokens.get(idx).unwrap_or(&self.tokens[0]);
        Some(token.silo_id.clone())
    }
}

/// A consistent hash ring mapping routing keys to owning silos (§4.2).
///
/// Reads are lock-free in spirit: `lookup` only ever clones the current
/// `Arc<RingSnapshot>` behind a short read lock. Writers (`insert`/`remove`)
/// build the next snapshot from scratch and swap it in atomically.
///
/// # Example
/// ```rust
/// use silo_rt::ring::ConsistentHashRing;
/// use silo_rt::util::SiloId;
///
/// let ring = ConsistentHashRing::new(10);
/// ring.insert(SiloId::new("silo-A"));
/// ring.insert(SiloId::new("silo-B"));
///
/// let owner = ring.lookup("Counter:c1");
/// assert!(owner.is_some());
/// ```
#[derive(Debug)]
pub struct ConsistentHashRing {
    snapshot: RwLock<Arc<RingSnapshot>>,
    virtual_node_count: usize,
}

impl ConsistentHashRing {
    /// Create an empty ring minting `virtual_node_count` tokens per silo.
    pub fn new(virtual_node_count: usize) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(RingSnapshot::default())),
            virtual_node_count,
        }
    }

    /// Insert `silo_id`, minting its virtual-node tokens. Idempotent: a
    /// silo already present has its tokens rebuilt, not duplicated.
    pub fn insert(&self, silo_id: SiloId) {
        let mut guard = self.snapshot.write();
        let mut tokens: Vec<Token> = guard
            .tokens
            .iter()
            .filter(|token| token.silo_id != silo_id)
            .cloned()
            .collect();
        tokens.extend(self.mint_tokens(&silo_id));
        tokens.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.silo_id.cmp(&b.silo_id)));
        *guard = Arc::new(RingSnapshot { tokens });
    }

    /// Remove `silo_id` and all of its tokens from the ring.
    pub fn remove(&self, silo_id: &SiloId) {
        let mut guard = self.snapshot.write();
        let tokens: Vec<Token> = guard
            .tokens
            .iter()
            .filter(|token| &token.silo_id != silo_id)
            .cloned()
            .collect();
        *guard = Arc::new(RingSnapshot { tokens });
    }

    /// Look up the silo owning `key`: the first token clockwise from
    /// `hash(key)`, wrapping around to the lowest token if none is higher.
    pub fn lookup(&self, key: &str) -> Option<SiloId> {
        self.snapshot.read().lookup(key)
    }

    /// Number of distinct silos currently on the ring.
    pub fn silo_count(&self) -> usize {
        let guard = self.snapshot.read();
        let mut ids: Vec<&SiloId> = guard.tokens.iter().map(|t| &t.silo_id).collect();
        ids.sort();
        ids.dedup();
        ids.len()
    }

    /// Total number of virtual-node tokens currently on the ring.
    pub fn token_count(&self) -> usize {
        self.snapshot.read().tokens.len()
    }

    fn mint_tokens(&self, silo_id: &SiloId) -> Vec<Token> {
        (0..self.virtual_node_count)
            .map(|i| Token {
                position: hash_str(&format!("{silo_id}:{i}")),
                silo_id: silo_id.clone(),
            })
            .collect()
    }
}

impl Default for ConsistentHashRing {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_NODES_PER_SILO)
    }
}

fn hash_str(value: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
