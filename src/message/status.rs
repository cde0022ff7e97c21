// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::ActorKey;

/// Outcome code carried by a response [`super::envelope::Envelope`] (§7).
///
/// `Ok` means the handler ran to completion; every other variant mirrors
/// one branch of the error taxonomy in §7 and is wire-safe (serializable),
/// since it must cross a silo boundary inside the envelope itself rather
/// than as a language-level exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    /// Handler completed normally; `payload` carries the result bytes.
    Ok,
    /// No silo owns the key (empty ring) or retries against the owner were exhausted.
    RoutingFailure,
    /// The envelope's deadline elapsed before a response arrived.
    DeadlineExceeded,
    /// Rejected by the mailbox: rate-limited, circuit-open, or bounded queue full with `Reject`.
    RejectedByMailbox,
    /// The actor's constructor or `on_activate` hook failed.
    ActivationFailure,
    /// The user handler itself returned an error.
    HandlerFault,
    /// A `Save` was attempted against a stale `expected_version`.
    ConcurrencyFailure,
    /// The type registry has no entry for the envelope's `type_id`.
    UnknownType,
    /// The actor type has no method with the envelope's `method` name.
    UnknownMethod,
    /// The call was cancelled for a reason other than its own deadline.
    Cancelled,
}

impl StatusCode {
    /// Whether this status represents a successful call.
    pub fn is_ok(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Error returned by the caller-facing surface of the runtime (router,
/// activator) when a call does not complete with `StatusCode::Ok`.
///
/// Mirrors §7's taxonomy one-to-one so a caller can match on the same
/// shape whether the failure originated locally or arrived over the wire
/// as a response envelope's `status_code`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// §7 RoutingFailure.
    #[error("no route to actor {0}")]
    RoutingFailure(ActorKey),

    /// §7 DeadlineExceeded.
    #[error("deadline exceeded for actor {0}")]
    DeadlineExceeded(ActorKey),

    /// §7 RejectedByMailbox.
    #[error("rejected by mailbox for actor {0}: {reason}", reason = .1)]
    RejectedByMailbox(ActorKey, String),

    /// §7 ActivationFailure.
    #[error("activation failed for actor {0}: {1}")]
    ActivationFailure(ActorKey, String),

    /// §7 HandlerFault.
    #[error("handler fault for actor {0}: {1}")]
    HandlerFault(ActorKey, String),

    /// §7 ConcurrencyFailure.
    #[error("concurrency failure for actor {0}: expected version {1}")]
    ConcurrencyFailure(ActorKey, u64),

    /// §7 UnknownType.
    #[error("unknown type: {0}")]
    UnknownType(crate::util::TypeId),

    /// §7 UnknownMethod.
    #[error("unknown method {1} for type {0}")]
    UnknownMethod(crate::util::TypeId, String),

    /// Cooperative cancellation that was not caused by the envelope's own deadline.
    #[error("call cancelled for actor {0}")]
    Cancelled(ActorKey),
}

impl EnvelopeError {
    /// Map to the wire-level [`StatusCode`] carried in a response envelope.
    pub fn status_code(&self) -> StatusCode {
        match self {
            EnvelopeError::RoutingFailure(_) => StatusCode::RoutingFailure,
            EnvelopeError::DeadlineExceeded(_) => StatusCode::DeadlineExceeded,
            EnvelopeError::RejectedByMailbox(..) => StatusCode::RejectedByMailbox,
            EnvelopeError::ActivationFailure(..) => StatusCode::ActivationFailure,
            EnvelopeError::HandlerFault(..) => StatusCode::HandlerFault,
            EnvelopeError::ConcurrencyFailure(..) => StatusCode::ConcurrencyFailure,
            EnvelopeError::UnknownType(_) => StatusCode::UnknownType,
            EnvelopeError::UnknownMethod(..) => StatusCode::UnknownMethod,
            EnvelopeError::Cancelled(_) => StatusCode::Cancelled,
        }
    }

    /// Router failures are caller-visible only (§7); every other kind is
    /// additionally reported to the parent supervisor via `HandlerFault`.
    pub fn reports_to_supervisor(&self) -> bool {
        matches!(self, EnvelopeError::HandlerFault(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::TypeId;

    fn key() -> ActorKey {
        ActorKey::new(TypeId::new("Counter"), "c1")
    }

    #[test]
    fn status_code_roundtrips_through_envelope_error() {
        let err = EnvelopeError::ConcurrencyFailure(key(), 3);
        assert_eq!(err.status_code(), StatusCode::ConcurrencyFailure);
    }

    #[test]
    fn only_handler_fault_reports_to_supervisor() {
        assert!(EnvelopeError::HandlerFault(key(), "boom".into()).reports_to_supervisor());
        assert!(!EnvelopeError::RoutingFailure(key()).reports_to_supervisor());
        assert!(!EnvelopeError::DeadlineExceeded(key()).reports_to_supervisor());
    }

    #[test]
    fn ok_status_is_ok() {
        assert!(StatusCode::Ok.is_ok());
        assert!(!StatusCode::RoutingFailure.is_ok());
    }
}
