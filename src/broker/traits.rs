//! The single entry point callers use to dispatch a call (§4.6).

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::message::Envelope;

/// Location-transparent envelope dispatch.
///
/// `route` never returns `Result`: like [`crate::activator::ActivatorManager::local_dispatch`],
/// every outcome — success, routing failure, transport failure, retries
/// exhausted — comes back as a response envelope with the failure embedded
/// in `status_code`/`error_message`. Callers inspect one shape regardless of
/// whether the failure happened locally or on a remote silo.
#[async_trait]
pub trait EnvelopeRouter: Send + Sync {
    /// Resolve the owner of `envelope.target` and dispatch it there, local or remote.
    async fn route(&self, envelope: Envelope) -> Envelope;
}
