//! Context handed to an [`Actor`](super::traits::Actor) on every hook call.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
use crate::util::{ActorKey, ChainId, SiloId};

/// Identity and per-turn metadata visible to a running activation.
///
/// Carries the chain id of the turn currently executing so a handler that
/// issues further calls can propagate it and stay inside the same
/// reentrancy chain (§3, §4.4).
#[derive(Debug, Clone)]
pub struct ActivationContext {
    key: ActorKey,
    silo_id: SiloId,
    chain_id: ChainId,
    activated_at: DateTime<Utc>,
}

impl ActivationContext {
    /// Create a context for a freshly constructed activation, starting a
    /// new reentrancy chain.
    pub fn new(key: ActorKey, silo_id: SiloId) -> Self {
        Self {
            key,
            silo_id,
            chain_id: ChainId::new(),
            activated_at: Utc::now(), // §3.2
        }
    }

    /// This activation's key.
    pub fn key(&self) -> &ActorKey {
        &self.key
    }

    /// The silo this activation currently lives on.
    pub fn silo_id(&self) -> &SiloId {
        &self.silo_id
    }

    /// The chain id of the turn currently executing.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Builder method: attach the chain id of the inbound call, so
    /// downstream calls made from this turn stay within the same chain.
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Timestamp this activation was constructed.
    pub fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }
}
