//! Consistent hash ring for actor placement (§4.2).
//!
//! [`ConsistentHashRing`] maps a routing key to the silo that owns it.
//! Lookups are lock-free reads against an immutable snapshot; membership
//! changes install a new snapshot atomically rather than mutating in place.
//! [`HierarchicalRing`] layers region/zone/silo rings for deployments that
//! want locality-aware placement.

pub mod hash_ring;
pub mod hierarchical;

pub use hash_ring::ConsistentHashRing;
pub use hierarchical::HierarchicalRing;
