//! Membership registry error types (§4.1).

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::SiloId;

/// Errors raised by [`super::registry::MembershipRegistry`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// `Register` was called for a silo id with a recent heartbeat from a different process.
    #[error("silo already registered: {0}")]
    AlreadyRegistered(SiloId),

    /// `Refresh` or `Unregister` was called for a silo id with no current record.
    #[error("silo not registered: {0}")]
    NotRegistered(SiloId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_silo() {
        let err = MembershipError::AlreadyRegistered(SiloId::new("silo-A"));
        assert!(err.to_string().contains("silo-A"));
    }
}
