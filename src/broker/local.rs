//! The default [`EnvelopeRouter`] implementation (§4.6).

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::traits::EnvelopeRouter;
use super::transport::{RemoteTransport, UnreachableTransport};
use crate::activator::ActivatorManager;
use crate::directory::ActorDirectory;
use crate::dlq::DeadLetterQueue;
use crate::message::{Envelope, StatusCode};
use crate::util::SiloId;

/// Bounded exponential backoff applied between routing attempts, per §6
/// `RouterRetries`/`RouterRetryBackoff`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay before attempt number `attempt` (0-based), doubling each time
    /// and capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt.min(10));
        self.base_delay.saturating_mul(multiplier).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Resolves ownership via the [`ActorDirectory`], then either dispatches
/// locally through the [`ActivatorManager`] or hands the envelope to a
/// [`RemoteTransport`]. Routing failures are retried with backoff and a
/// fresh directory lookup (§4.6, §7); exhausted retries land in the
/// [`DeadLetterQueue`] and are reported back to the caller as
/// `StatusCode::RoutingFailure`, never to the supervisor.
pub struct LocalRouter<T: RemoteTransport = UnreachableTransport> {
    self_id: SiloId,
    directory: Arc<ActorDirectory>,
    activator: Arc<ActivatorManager>,
    transport: T,
    dead_letters: Arc<DeadLetterQueue>,
    retries: RetryPolicy,
}

impl<T: RemoteTransport> LocalRouter<T> {
    /// Build a router for `self_id` with an explicit remote transport.
    pub fn new(
        self_id: SiloId,
        directory: Arc<ActorDirectory>,
        activator: Arc<ActivatorManager>,
        transport: T,
        dead_letters: Arc<DeadLetterQueue>,
    ) -> Self {
        Self {
            self_id,
            directory,
            activator,
            transport,
            dead_letters,
            retries: RetryPolicy::default(),
        }
    }

    /// Builder method: override the default retry policy.
    pub fn with_retry_policy(mut self, retries: RetryPolicy) -> Self {
        self.retries = retries;
        self
    }

    async fn route_once(&self, envelope: &Envelope) -> Option<Envelope> {
        let Some(owner) = self.directory.owner_of(&envelope.target) else {
            return None;
        };

        if owner == self.self_id {
            return Some(self.activator.local_dispatch(envelope).await);
        }

        match self.transport.send(&owner, envelope.clone()).await {
            Ok(response) => Some(response),
            Err(err) => {
                warn!(actor = %envelope.target, silo = %owner, error = %err, "remote dispatch failed");
                None
            }
        }
    }
}

#[async_trait]
impl<T: RemoteTransport> EnvelopeRouter for LocalRouter<T> {
    async fn route(&self, envelope: Envelope) -> Envelope {
        for attempt in 0..self.retries.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.retries.delay_for(attempt - 1)).await;
            }

            if let Some(response) = self.route_once(&envelope).await {
                return response;
            }
        }

        debug!(actor = %envelope.target, attempts = self.retries.max_attempts, "routing retries exhausted");
        self.dead_letters.record(envelope.clone(), "routing retries exhausted");
        envelope.respond_error(
            StatusCode::RoutingFailure,
            format!(
                "no owner reachable for {} after {} attempts",
                envelope.target, self.retries.max_attempts
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::ConsistentHashRing;
    use crate::typeregistry::TypeRegistry;
    use crate::util::{ActorKey, TypeId};
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl crate::activator::Actor for Echo {
        async fn handle_call(
            &mut self,
            method: &str,
            payload: Vec<u8>,
            _ctx: &crate::activator::ActivationContext,
        ) -> Result<Vec<u8>, crate::activator::ActorError> {
            match method {
                "echo" => Ok(payload),
                _ => Err(crate::activator::ActorError::from("unknown method")),
            }
        }
    }

    fn router(self_id: &str) -> LocalRouter<UnreachableTransport> {
        let ring = Arc::new(ConsistentHashRing::new(50));
        ring.insert(SiloId::new(self_id));
        let directory = Arc::new(ActorDirectory::new(ring));
        let registry = Arc::new(TypeRegistry::new());
        registry.register(TypeId::new("Echo"), || Box::new(Echo));
        let activator = Arc::new(ActivatorManager::new(
            SiloId::new(self_id),
            registry,
            Duration::from_secs(60),
        ));
        LocalRouter::new(
            SiloId::new(self_id),
            directory,
            activator,
            UnreachableTransport,
            Arc::new(DeadLetterQueue::default()),
        )
        .with_retry_policy(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        })
    }

    #[tokio::test]
    async fn routes_to_local_owner_without_a_transport() {
        let router = router("silo-A");
        let request = Envelope::request(ActorKey::new(TypeId::new("Echo"), "e1"), "echo", vec![7]);
        let response = router.route(request).await;
        assert_eq!(response.status_code, StatusCode::Ok);
        assert_eq!(response.payload, vec![7]);
    }

    #[tokio::test]
    async fn remote_owner_with_unreachable_transport_exhausts_retries_into_dlq() {
        let ring = Arc::new(ConsistentHashRing::new(50));
        ring.insert(SiloId::new("silo-B"));
        let directory = Arc::new(ActorDirectory::new(ring));
        let registry = Arc::new(TypeRegistry::new());
        let activator = Arc::new(ActivatorManager::new(
            SiloId::new("silo-A"),
            registry,
            Duration::from_secs(60),
        ));
        let dlq = Arc::new(DeadLetterQueue::default());
        let router = LocalRouter::new(
            SiloId::new("silo-A"),
            directory,
            activator,
            UnreachableTransport,
            dlq.clone(),
        )
        .with_retry_policy(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        });

        let request = Envelope::request(ActorKey::new(TypeId::new("Echo"), "e1"), "echo", vec![]);
        let response = router.route(request).await;

        assert_eq!(response.status_code, StatusCode::RoutingFailure);
        assert_eq!(dlq.len(), 1);
    }

    #[tokio::test]
    async fn empty_ring_is_a_routing_failure_without_touching_the_transport() {
        let ring = Arc::new(ConsistentHashRing::new(50));
        let directory = Arc::new(ActorDirectory::new(ring));
        let registry = Arc::new(TypeRegistry::new());
        let activator = Arc::new(ActivatorManager::new(
            SiloId::new("silo-A"),
            registry,
            Duration::from_secs(60),
        ));
        let router = LocalRouter::new(
            SiloId::new("silo-A"),
            directory,
            activator,
            UnreachableTransport,
            Arc::new(DeadLetterQueue::default()),
        )
        .with_retry_policy(RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        });

        let request = Envelope::request(ActorKey::new(TypeId::new("Echo"), "e1"), "echo", vec![]);
        let response = router.route(request).await;
        assert_eq!(response.status_code, StatusCode::RoutingFailure);
    }
}
