//! Sticky migration override record (§4.3, §6 registry key layout).

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
use crate::util::SiloId;

/// Conservative default TTL when none is given: at least twice the activation
/// timeout, per the open question in §9 on override-expiry behavior.
pub const DEFAULT_OVERRIDE_TTL: std::time::Duration = std::time::Duration::from_secs(60);

/// A short-lived redirect written during a controlled migration: while
/// present, the directory returns `target_silo` instead of the ring's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOverride {
    pub target_silo: SiloId,
    pub expires_at: DateTime<Utc>,
}

impl MigrationOverride {
    /// Create an override pinning to `target_silo` for `ttl`.
    pub fn new(target_silo: SiloId, ttl: std::time::Duration) -> Self {
        Self {
            target_silo,
            expires_at: Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_default(),
        }
    }

    /// Whether this override's TTL has elapsed.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_override_is_not_expired() {
        let ov = MigrationOverride::new(SiloId::new("silo-B"), std::time::Duration::from_secs(30));
        assert!(!ov.is_expired());
    }

    #[test]
    fn zero_ttl_override_is_immediately_expired() {
        let ov = MigrationOverride::new(SiloId::new("silo-B"), std::time::Duration::from_millis(0));
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(ov.is_expired());
    }
}
