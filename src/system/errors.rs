//! Silo-level error types.

// Layer 1: Standard library
use std::time::Duration;

// Layer 2: Third-party
use thiserror::Error;

// Layer 3: Internal
use crate::membership::MembershipError;
use crate::util::ActorKey;

/// Errors produced while starting, running, or stopping a [`super::Silo`].
#[derive(Error, Debug)]
pub enum SiloError {
    /// Activation with given key could not be found or created.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorKey),

    /// The silo is already shutting down or stopped; the operation cannot proceed.
    #[error("silo shutdown in progress")]
    ShuttingDown,

    /// Concurrent activation count exceeds `SiloConfig::max_actors`.
    #[error("actor limit exceeded: current {current}, max {max}")]
    ActorLimitExceeded { current: usize, max: usize },

    /// Graceful shutdown did not complete within `SiloConfig::shutdown_timeout`.
    #[error("shutdown timeout exceeded after {0:?}")]
    ShutdownTimeout(Duration),

    /// Failed to register this silo's own record in the membership registry at startup.
    #[error("failed to join cluster membership: {0}")]
    MembershipJoinFailed(#[from] MembershipError),

    /// Configuration failed validation.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl SiloError {
    /// Check if error is transient (can retry).
    pub fn is_transient(&self) -> bool {
        matches!(self, SiloError::ActorLimitExceeded { .. })
    }

    /// Check if error is fatal (the silo must stop).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SiloError::ShuttingDown
                | SiloError::ShutdownTimeout(_)
                | SiloError::MembershipJoinFailed(_)
        )
    }

    /// Check if error is recoverable without stopping the silo.
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}
