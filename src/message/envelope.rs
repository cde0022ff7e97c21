// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use super::status::StatusCode;
use crate::util::{ActorKey, ChainId, EnvelopeId};

/// The wire-level message unit carrying a call or its response (§3, §6).
///
/// An envelope is immutable once sent; the caller retains the response
/// future keyed by `envelope_id` in a per-connection correlation table
/// (see [`crate::router`]). Builder methods return `Self` so a call site
/// reads as a single fluent expression.
///
/// # Example
/// ```rust
/// use silo_rt::message::Envelope;
/// use silo_rt::util::{ActorKey, TypeId};
///
/// let target = ActorKey::new(TypeId::new("Counter"), "c1");
/// let envelope = Envelope::request(target, "inc", vec![1])
///     .with_deadline(std::time::Duration::from_secs(5));
///
/// assert!(!envelope.is_expired());
/// assert!(!envelope.is_response);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Silo-local monotonic id; the response carries the request's id for correlation.
    pub envelope_id: EnvelopeId,

    /// Propagated for reentrancy (§3, §4.4): re-entrant calls inside one chain share this id.
    pub chain_id: ChainId,

    /// The actor this call is addressed to.
    pub target: ActorKey,

    /// Method name, dispatched by the type registry (§6, §9).
    pub method: String,

    /// Opaque call or response payload, encoded by the type-registered codec.
    pub payload: Vec<u8>,

    /// Wall-clock deadline; `None` means "no deadline."
    pub deadline: Option<DateTime<Utc>>,

    /// One-way envelopes carry no response and are not tracked in the correlation table.
    pub is_one_way: bool,

    /// `true` once this envelope has been turned into a response to an earlier request.
    pub is_response: bool,

    /// Outcome of the call; only meaningful when `is_response` is `true`.
    pub status_code: StatusCode,

    /// Human-readable detail when `status_code != Ok`.
    pub error_message: Option<String>,

    /// Creation timestamp (§3.2 chrono standard).
    pub created_at: DateTime<Utc>,
}

impl Envelope {
    /// Build a fresh request envelope. `envelope_id` is filled in by the
    /// caller via [`crate::util::EnvelopeIdGenerator`] before it leaves the silo.
    pub fn request(target: ActorKey, method: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            envelope_id: EnvelopeId::from_raw(0),
            chain_id: ChainId::new(),
            target,
            method: method.into(),
            payload,
            deadline: None,
            is_one_way: false,
            is_response: false,
            status_code: StatusCode::Ok,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    /// Builder method: assign the silo-local envelope id.
    pub fn with_envelope_id(mut self, id: EnvelopeId) -> Self {
        self.envelope_id = id;
        self
    }

    /// Builder method: propagate an existing chain id instead of minting a new one.
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Builder method: set an absolute deadline `ttl` from now.
    pub fn with_deadline(mut self, ttl: Duration) -> Self {
        self.deadline =
            Utc::now().checked_add_signed(chrono::Duration::from_std(ttl).unwrap_or_default());
        self
    }

    /// Builder method: mark as one-way (fire-and-forget; no response expected).
    pub fn one_way(mut self) -> Self {
        self.is_one_way = true;
        self
    }

    /// Construct the response envelope for this request, carrying the
    /// original `envelope_id` for correlation (§6 wire envelope format).
    pub fn respond_ok(&self, payload: Vec<u8>) -> Self {
        Self {
            envelope_id: self.envelope_id,
            chain_id: self.chain_id,
            target: self.target.clone(),
            method: self.method.clone(),
            payload,
            deadline: None,
            is_one_way: false,
            is_response: true,
            status_code: StatusCode::Ok,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    /// Construct an error response envelope for this request.
    pub fn respond_error(&self, status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            envelope_id: self.envelope_id,
            chain_id: self.chain_id,
            target: self.target.clone(),
            method: self.method.clone(),
            payload: Vec::new(),
            deadline: None,
            is_one_way: false,
            is_response: true,
            status_code,
            error_message: Some(message.into()),
            created_at: Utc::now(),
        }
    }

    /// Whether the deadline, if any, has already elapsed.
    pub fn is_expired(&self) -> bool {
        match self.deadline {
            Some(deadline) => Utc::now() > deadline,
            None => false,
        }
    }

    /// Remaining time until the deadline, or `None` if there is no deadline
    /// or it has already passed.
    pub fn time_remaining(&self) -> Option<Duration> {
        let deadline = self.deadline?;
        let remaining = deadline.signed_duration_since(Utc::now());
        remaining.to_std().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::TypeId;

    fn target() -> ActorKey {
        ActorKey::new(TypeId::new("Counter"), "c1")
    }

    #[test]
    fn request_has_no_deadline_by_default() {
        let envelope = Envelope::request(target(), "inc", vec![1]);
        assert!(!envelope.is_expired());
        assert!(envelope.deadline.is_none());
    }

    #[test]
    fn with_deadline_expires_in_the_past_immediately_detectable() {
        let envelope =
            Envelope::request(target(), "inc", vec![1]).with_deadline(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(envelope.is_expired());
    }

    #[test]
    fn respond_ok_preserves_envelope_id_and_chain_id() {
        let request =
            Envelope::request(target(), "inc", vec![1]).with_envelope_id(EnvelopeId::from_raw(7));
        let response = request.respond_ok(vec![2]);

        assert_eq!(response.envelope_id, request.envelope_id);
        assert_eq!(response.chain_id, request.chain_id);
        assert!(response.is_response);
        assert_eq!(response.status_code, StatusCode::Ok);
    }

    #[test]
    fn respond_error_carries_status_and_message() {
        let request = Envelope::request(target(), "inc", vec![1]);
        let response = request.respond_error(StatusCode::UnknownMethod, "no such method");

        assert_eq!(response.status_code, StatusCode::UnknownMethod);
        assert_eq!(response.error_message.as_deref(), Some("no such method"));
    }

    #[test]
    fn one_way_envelopes_are_flagged() {
        let envelope = Envelope::request(target(), "notify", vec![]).one_way();
        assert!(envelope.is_one_way);
    }

    #[test]
    fn chain_id_propagates_via_builder() {
        let chain = ChainId::new();
        let envelope = Envelope::request(target(), "inner", vec![]).with_chain_id(chain);
        assert_eq!(envelope.chain_id, chain);
    }
}
