//! Region/zone/silo tiered ring for locality-aware placement (§4.2).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::hash_ring::ConsistentHashRing;
use crate::util::SiloId;

/// Three-tier ring: region, then zone within region, then silo within zone.
///
/// `lookup` walks the caller's preferred region/zone first and falls back
/// to the global silo ring when no preference is given or the preferred
/// bucket is empty. Virtual-node counts per tier follow §4.2: region ≈ 1/3
/// of the silo tier's count, zone ≈ 1/2.
#[derive(Debug)]
pub struct HierarchicalRing {
    region_ring: ConsistentHashRing,
    zone_ring: ConsistentHashRing,
    silo_ring: ConsistentHashRing,
}

impl HierarchicalRing {
    /// Build a hierarchical ring whose silo tier mints `virtual_nodes_per_silo` tokens.
    pub fn new(virtual_nodes_per_silo: usize) -> Self {
        Self {
            region_ring: ConsistentHashRing::new((virtual_nodes_per_silo / 3).max(1)),
            zone_ring: ConsistentHashRing::new((virtual_nodes_per_silo / 2).max(1)),
            silo_ring: ConsistentHashRing::new(virtual_nodes_per_silo),
        }
    }

    /// Register a silo under its region and zone, and on the global silo ring.
    pub fn insert(&self, region_id: &str, zone_id: &str, silo_id: SiloId) {
        self.region_ring.insert(SiloId::new(region_id));
        self.zone_ring.insert(SiloId::new(zone_id));
        self.silo_ring.insert(silo_id);
    }

    /// Remove a silo from the global silo ring. Region/zone tokens are left
    /// in place since other silos may still share that region or zone.
    pub fn remove(&self, silo_id: &SiloId) {
        self.silo_ring.remove(silo_id);
    }

    /// Look up the owning silo for `key`, preferring `preferred_region` and
    /// `preferred_zone` when given, falling back to the global silo ring.
    pub fn lookup(
        &self,
        key: &str,
        preferred_region: Option<&str>,
        preferred_zone: Option<&str>,
    ) -> Option<SiloId> {
        if let Some(zone) = preferred_zone {
            if self.zone_ring.lookup(zone).is_some() {
                if let Some(owner) = self.silo_ring.lookup(&format!("{zone}:{key}")) {
                    return Some(owner);
                }
            }
        }
        if let Some(region) = preferred_region {
            if self.region_ring.lookup(region).is_some() {
                if let Some(owner) = self.silo_ring.lookup(&format!("{region}:{key}")) {
                    return Some(owner);
                }
            }
        }
        self.silo_ring.lookup(key)
    }
}

impl Default for HierarchicalRing {
    fn default() -> Self {
        Self::new(super::hash_ring::DEFAULT_VIRTUAL_NODES_PER_SILO)
    }
}
