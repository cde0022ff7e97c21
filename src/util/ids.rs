// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Layer 3: Internal module imports
// (none)

/// Identifier for a silo (a process participating in cluster membership).
///
/// Silo ids are operator-assigned strings (e.g. `"silo-A"`), not generated
/// UUIDs, because they must be stable across process restarts for a given
/// deployment slot.
///
/// # Example
/// ```rust
/// use silo_rt::util::SiloId;
///
/// let a = SiloId::new("silo-A");
/// let b = SiloId::new("silo-B");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiloId(String);

impl SiloId {
    /// Create a silo id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SiloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SiloId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SiloId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Stable identifier for an actor type, e.g. `"Counter@v1"`.
///
/// Type ids are registered once at startup against a constructor, a
/// dispatcher and a codec (see [`crate::typeregistry`]); they are never
/// derived at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(String);

impl TypeId {
    /// Create a type id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The two-part globally unique actor identity: `(type_id, actor_id)`.
///
/// `ActorKey` is the routing key fed to the hash ring (`type_id:actor_id`,
/// see [`crate::ring`]) and the map key of the per-silo activation table
/// (see [`crate::activator`]).
///
/// # Example
/// ```rust
/// use silo_rt::util::{ActorKey, TypeId};
///
/// let key = ActorKey::new(TypeId::new("Counter"), "c1");
/// assert_eq!(key.routing_key(), "Counter:c1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorKey {
    pub type_id: TypeId,
    pub actor_id: String,
}

impl ActorKey {
    /// Create an actor key from a type id and an actor id.
    pub fn new(type_id: TypeId, actor_id: impl Into<String>) -> Self {
        Self {
            type_id,
            actor_id: actor_id.into(),
        }
    }

    /// The string fed to [`crate::ring::ConsistentHashRing::lookup`]:
    /// `"{type_id}:{actor_id}"`, per §4.3.
    pub fn routing_key(&self) -> String {
        format!("{}:{}", self.type_id, self.actor_id)
    }
}

impl Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_id, self.actor_id)
    }
}

/// Silo-local monotonic envelope identifier.
///
/// Unique only within the silo that minted it; a response envelope carries
/// the `envelope_id` of the request it answers so the caller's correlation
/// table can resolve the matching completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnvelopeId(u64);

impl EnvelopeId {
    /// Wrap a raw value, e.g. one read off the wire.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-silo generator of [`EnvelopeId`]s.
///
/// A single counter shared by every connection originating from this silo;
/// `fetch_add` under `Relaxed` is sufficient because the only requirement is
/// uniqueness, not ordering across silos.
#[derive(Debug, Default)]
pub struct EnvelopeIdGenerator(AtomicU64);

impl EnvelopeIdGenerator {
    /// Create a generator starting at 0.
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Mint the next envelope id.
    pub fn next(&self) -> EnvelopeId {
        EnvelopeId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

/// Chain identifier propagated through every envelope spawned while
/// handling a call, enabling reentrancy (§3, §4.4).
///
/// Distinct from [`EnvelopeId`]: many envelopes can share one chain_id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(Uuid);

impl ChainId {
    /// Start a new chain at the edge (i.e. where an external client call
    /// enters the cluster).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing uuid, e.g. one decoded off the wire.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying uuid.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a supervised child within a supervisor tree.
///
/// In this domain a child is always an [`ActorKey`]; `ChildId` exists as a
/// thin wrapper so supervisor bookkeeping (`§4.8`) does not need to know
/// about actor-key internals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildId(ActorKey);

impl ChildId {
    /// Wrap the child's actor key.
    pub fn new(key: ActorKey) -> Self {
        Self(key)
    }

    /// Borrow the wrapped actor key.
    pub fn actor_key(&self) -> &ActorKey {
        &self.0
    }
}

impl Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
