//! Router-level error types (§4.6, §7 `RoutingFailure`).

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::{ActorKey, SiloId};

/// Failures internal to routing, distinct from [`crate::message::EnvelopeError`]:
/// these never reach the supervisor, only the caller (§7 "Router failures
/// are not reported to the supervisor").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// The directory has no owner for this key (empty ring).
    #[error("no silo owns {0}")]
    NoOwner(ActorKey),

    /// The remote transport could not reach the owning silo.
    #[error("transport error reaching {silo} for {key}: {reason}")]
    TransportError {
        key: ActorKey,
        silo: SiloId,
        reason: String,
    },

    /// Retries against successive owners were exhausted.
    #[error("retries exhausted routing {key} after {attempts} attempts")]
    RetriesExhausted { key: ActorKey, attempts: u32 },
}
