//! Membership record and event types (§4.1).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::util::SiloId;

/// Lifecycle status of a silo as observed through the membership registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiloStatus {
    /// Registered but has not yet completed startup (joined the ring, started its listener).
    Joining,
    /// Accepting new activations and routable traffic.
    Active,
    /// Shutting down: no new non-local envelopes are accepted (§6 `DrainAsync`).
    Draining,
    /// Evicted by a peer's health monitor or unregistered by itself.
    Dead,
}

/// A silo's membership record (§6 registry key layout: `<prefix>:silo:<silo_id>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiloRecord {
    pub silo_id: SiloId,
    pub address: String,
    pub region_id: String,
    pub zone_id: String,
    pub status: SiloStatus,
    pub last_heartbeat: DateTime<Utc>,
}

impl SiloRecord {
    /// Build a fresh record for a silo joining the cluster, stamped `now`.
    pub fn new(silo_id: SiloId, address: impl Into<String>, region_id: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            silo_id,
            address: address.into(),
            region_id: region_id.into(),
            zone_id: zone_id.into(),
            status: SiloStatus::Joining,
            last_heartbeat: Utc::now(),
        }
    }

    /// Whether `now - last_heartbeat` exceeds `timeout` (§4.1 Timeout eviction policy).
    pub fn is_stale(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> bool {
        now.signed_duration_since(self.last_heartbeat) > timeout
    }
}

/// An event published on the membership channel (§4.1 `join:<silo_id>` / `leave:<silo_id>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MembershipEvent {
    /// A silo registered or refreshed with a status change to `Active`.
    Joined(SiloRecord),
    /// A silo unregistered itself or was evicted.
    Left(SiloId),
}

/// Eviction policy controlling when a peer's record is removed (§4.1, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EvictionPolicy {
    /// Never evict automatically; only explicit `Unregister` removes a record.
    None,
    /// Evict when `now - last_heartbeat > HeartbeatTimeout`.
    #[default]
    Timeout,
    /// Evict after `N` consecutive health samples fall below a threshold.
    HealthScore,
    /// Evict on either condition.
    Hybrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_record_starts_joining() {
        let record = SiloRecord::new(SiloId::new("silo-A"), "127.0.0.1:7001", "us-east", "us-east-1a");
        assert_eq!(record.status, SiloStatus::Joining);
    }

    #[test]
    fn staleness_respects_timeout() {
        let mut record = SiloRecord::new(SiloId::new("silo-A"), "127.0.0.1:7001", "us-east", "us-east-1a");
        record.last_heartbeat = Utc::now() - chrono::Duration::seconds(60);
        assert!(record.is_stale(Utc::now(), chrono::Duration::seconds(30)));
        assert!(!record.is_stale(Utc::now(), chrono::Duration::seconds(120)));
    }

    #[test]
    fn default_eviction_policy_is_timeout() {
        assert_eq!(EvictionPolicy::default(), EvictionPolicy::Timeout);
    }
}
