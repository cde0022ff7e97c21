//! In-memory membership registry with TTL records and a join/leave event stream (§4.1).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::Utc; // §3.2 MANDATORY
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, info};

// Layer 3: Internal module imports
use super::error::MembershipError;
use super::types::{MembershipEvent, SiloRecord, SiloStatus};
use crate::util::SiloId;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The live silo set for one cluster (§4.1).
///
/// A temporary outage of the backing store (in a distributed deployment,
/// this would be a shared store; here it is simply this in-process map)
/// does not tear down local activations: it only prevents learning about
/// new peers until the next successful `refresh`.
pub struct MembershipRegistry {
    records: DashMap<SiloId, SiloRecord>,
    heartbeat_timeout: chrono::Duration,
    events: broadcast::Sender<MembershipEvent>,
}

impl MembershipRegistry {
    /// Create a registry that considers a record stale after `heartbeat_timeout`.
    pub fn new(heartbeat_timeout: std::time::Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            records: DashMap::new(),
            heartbeat_timeout: chrono::Duration::from_std(heartbeat_timeout).unwrap_or_default(),
            events,
        }
    }

    /// Register a silo, publishing `join:<silo_id>`. Fails with
    /// `AlreadyRegistered` if a non-stale record already exists.
    pub fn register(&self, mut record: SiloRecord) -> Result<(), MembershipError> {
        if let Some(existing) = self.records.get(&record.silo_id) {
            if !existing.is_stale(Utc::now(), self.heartbeat_timeout) {
                return Err(MembershipError::AlreadyRegistered(record.silo_id));
            }
        }

        record.status = SiloStatus::Active;
        record.last_heartbeat = Utc::now();
        self.records.insert(record.silo_id.clone(), record.clone());
        info!(silo = %record.silo_id, "silo joined");
        let _ = self.events.send(MembershipEvent::Joined(record));
        Ok(())
    }

    /// Rewrite the record's TTL. Called every `HeartbeatInterval`.
    pub fn refresh(&self, silo_id: &SiloId) -> Result<(), MembershipError> {
        let mut entry = self
            .records
            .get_mut(silo_id)
            .ok_or_else(|| MembershipError::NotRegistered(silo_id.clone()))?;
        entry.last_heartbeat = Utc::now();
        debug!(silo = %silo_id, "heartbeat refreshed");
        Ok(())
    }

    /// Delete the record and publish `leave:<silo_id>`.
    pub fn unregister(&self, silo_id: &SiloId) -> Result<(), MembershipError> {
        self.records
            .remove(silo_id)
            .ok_or_else(|| MembershipError::NotRegistered(silo_id.clone()))?;
        info!(silo = %silo_id, "silo left");
        let _ = self.events.send(MembershipEvent::Left(silo_id.clone()));
        Ok(())
    }

    /// Evict a peer unconditionally (used by the health monitor; §4.1 eviction).
    pub fn evict(&self, silo_id: &SiloId) {
        if self.records.remove(silo_id).is_some() {
            info!(silo = %silo_id, "silo evicted");
            let _ = self.events.send(MembershipEvent::Left(silo_id.clone()));
        }
    }

    /// Scan current records for every `Active` silo.
    pub fn list_active(&self) -> Vec<SiloRecord> {
        self.records
            .iter()
            .filter(|entry| entry.status == SiloStatus::Active)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// All records regardless of status, for the health monitor's staleness sweep.
    pub fn list_all(&self) -> Vec<SiloRecord> {
        self.records.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Subscribe to join/leave events.
    pub fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.events.subscribe()
    }

    /// The heartbeat timeout this registry considers a record stale after.
    pub fn heartbeat_timeout(&self) -> chrono::Duration {
        self.heartbeat_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> SiloRecord {
        SiloRecord::new(SiloId::new(id), "127.0.0.1:7001", "us-east", "us-east-1a")
    }

    #[test]
    fn register_then_list_active() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        registry.register(record("silo-A")).unwrap();
        assert_eq!(registry.list_active().len(), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        registry.register(record("silo-A")).unwrap();
        let err = registry.register(record("silo-A"));
        assert!(matches!(err, Err(MembershipError::AlreadyRegistered(_))));
    }

    #[test]
    fn unregister_removes_the_record() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        registry.register(record("silo-A")).unwrap();
        registry.unregister(&SiloId::new("silo-A")).unwrap();
        assert!(registry.list_active().is_empty());
    }

    #[test]
    fn refresh_unknown_silo_errors() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        let err = registry.refresh(&SiloId::new("silo-ghost"));
        assert!(matches!(err, Err(MembershipError::NotRegistered(_))));
    }

    #[test]
    fn stale_registration_can_be_replaced() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        registry.register(record("silo-A")).unwrap();

        registry
            .records
            .get_mut(&SiloId::new("silo-A"))
            .unwrap()
            .last_heartbeat = Utc::now() - chrono::Duration::seconds(120);

        assert!(registry.register(record("silo-A")).is_ok());
    }

    #[tokio::test]
    async fn subscribers_observe_join_and_leave_events() {
        let registry = MembershipRegistry::new(std::time::Duration::from_secs(30));
        let mut events = registry.subscribe();

        registry.register(record("silo-A")).unwrap();
        let joined = events.recv().await.unwrap();
        assert!(matches!(joined, MembershipEvent::Joined(_)));

        registry.unregister(&SiloId::new("silo-A")).unwrap();
        let left = events.recv().await.unwrap();
        assert_eq!(left, MembershipEvent::Left(SiloId::new("silo-A")));
    }
}
