//! The pluggable seam for cross-silo delivery (§4.6, §9).
//!
//! The core crate only owns the contract: a [`RemoteTransport`] turns a
//! request [`Envelope`] addressed to a remote silo into a response
//! envelope. Wiring an actual network transport (TCP, QUIC, a service mesh)
//! is left to an adapter crate; [`UnreachableTransport`] is the default used
//! by a [`super::LocalRouter`] built without one, so a single-silo
//! deployment never has to think about it.

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::error::BrokerError;
use crate::message::Envelope;
use crate::util::SiloId;

/// Delivers an envelope to a silo other than the caller's own.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Send `envelope` to `target` and return its response.
    async fn send(&self, target: &SiloId, envelope: Envelope) -> Result<Envelope, BrokerError>;
}

/// A transport that always fails. The default for a router that has not
/// been wired to an actual network transport.
#[derive(Debug, Default, Clone)]
pub struct UnreachableTransport;

#[async_trait]
impl RemoteTransport for UnreachableTransport {
    async fn send(&self, target: &SiloId, envelope: Envelope) -> Result<Envelope, BrokerError> {
        Err(BrokerError::TransportError {
            key: envelope.target,
            silo: target.clone(),
            reason: "no remote transport configured".to_string(),
        })
    }
}
