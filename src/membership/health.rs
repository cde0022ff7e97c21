//! Peer health monitor: evicts stale or unhealthy silos (§4.1).
//!
//! Every silo runs one of these, acting only on its peers' records, never
//! its own. `None` eviction is a no-op sweep (only explicit `Unregister`
//! removes a record).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::Utc; // §3.2 MANDATORY
use dashmap::DashMap;
use tracing::warn;

// Layer 3: Internal module imports
use super::registry::MembershipRegistry;
use super::types::EvictionPolicy;
use crate::util::SiloId;

/// Default consecutive unhealthy samples before a `HealthScore` eviction (§6).
pub const DEFAULT_CONSECUTIVE_UNHEALTHY_CHECKS: u32 = 3;

/// Sweeps peer records and evicts unreachable or unhealthy silos.
pub struct HealthMonitor {
    self_id: SiloId,
    policy: EvictionPolicy,
    consecutive_unhealthy_threshold: u32,
    unhealthy_streaks: DashMap<SiloId, u32>,
}

impl HealthMonitor {
    /// Create a monitor for the silo `self_id`, which never evicts itself.
    pub fn new(self_id: SiloId, policy: EvictionPolicy) -> Self {
        Self {
            self_id,
            policy,
            consecutive_unhealthy_threshold: DEFAULT_CONSECUTIVE_UNHEALTHY_CHECKS,
            unhealthy_streaks: DashMap::new(),
        }
    }

    /// Override the consecutive-unhealthy-sample threshold (§6 `ConsecutiveUnhealthyChecks`).
    pub fn with_consecutive_unhealthy_threshold(mut self, threshold: u32) -> Self {
        self.consecutive_unhealthy_threshold = threshold;
        self
    }

    /// Record one out-of-band health sample for `peer` (e.g. a failed probe
    /// or a missed direct heartbeat). Feeds the `HealthScore`/`Hybrid` policies.
    pub fn record_health_sample(&self, peer: &SiloId, healthy: bool) {
        if healthy {
            self.unhealthy_streaks.remove(peer);
        } else {
            *self.unhealthy_streaks.entry(peer.clone()).or_insert(0) += 1;
        }
    }

    /// Evaluate every peer record against the configured policy and evict
    /// those that fail it, returning the evicted silo ids (§4.1).
    pub fn sweep(&self, registry: &MembershipRegistry) -> Vec<SiloId> {
        if matches!(self.policy, EvictionPolicy::None) {
            return Vec::new();
        }

        let now = Utc::now();
        let timeout = registry.heartbeat_timeout();
        let mut evicted = Vec::new();

        for record in registry.list_all() {
            if record.silo_id == self.self_id {
                continue;
            }

            let timed_out = matches!(self.policy, EvictionPolicy::Timeout | EvictionPolicy::Hybrid)
                && record.is_stale(now, timeout);
            let unhealthy = matches!(self.policy, EvictionPolicy::HealthScore | EvictionPolicy::Hybrid)
                && self
                    .unhealthy_streaks
                    .get(&record.silo_id)
                    .is_some_and(|streak| *streak >= self.consecutive_unhealthy_threshold);

            if timed_out || unhealthy {
                warn!(silo = %record.silo_id, timed_out, unhealthy, "evicting peer");
                registry.evict(&record.silo_id);
                self.unhealthy_streaks.remove(&record.silo_id);
                evicted.push(record.silo_id);
            }
        }

        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::types::SiloRecord;

    fn record_stale(id: &str) -> SiloRecord {
        let mut record = SiloRecord::new(SiloId::new(id), "127.0.0.1:1", "r", "z");
        record.last_heartbeat = Utc::now() - chrono::Duration::seconds(120);
        record
    }

    #[test]
    fn none_policy_never_evicts() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        registry.register(record_stale("silo-A")).unwrap();

        let monitor = HealthMonitor::new(SiloId::new("silo-self"), EvictionPolicy::None);
        assert!(monitor.sweep(&registry).is_empty());
    }

    #[test]
    fn timeout_policy_evicts_stale_peers() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        registry.register(record_stale("silo-A")).unwrap();

        let monitor = HealthMonitor::new(SiloId::new("silo-self"), EvictionPolicy::Timeout);
        let evicted = monitor.sweep(&registry);
        assert_eq!(evicted, vec![SiloId::new("silo-A")]);
        assert!(registry.list_active().is_empty());
    }

    #[test]
    fn health_monitor_never_evicts_itself() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        registry.register(record_stale("silo-self")).unwrap();

        let monitor = HealthMonitor::new(SiloId::new("silo-self"), EvictionPolicy::Timeout);
        assert!(monitor.sweep(&registry).is_empty());
    }

    #[test]
    fn health_score_policy_needs_the_consecutive_threshold() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(300));
        registry
            .register(SiloRecord::new(SiloId::new("silo-A"), "127.0.0.1:1", "r", "z"))
            .unwrap();

        let monitor = HealthMonitor::new(SiloId::new("silo-self"), EvictionPolicy::HealthScore)
            .with_consecutive_unhealthy_threshold(2);

        monitor.record_health_sample(&SiloId::new("silo-A"), false);
        assert!(monitor.sweep(&registry).is_empty());

        monitor.record_health_sample(&SiloId::new("silo-A"), false);
        assert_eq!(monitor.sweep(&registry), vec![SiloId::new("silo-A")]);
    }
}
