//! Owns the silo-local activation table: lazy activation, mailbox-backed
//! turn dispatch, reentrant self-calls, circuit breaking, deactivation, and
//! the idle GC sweep (§3, §4.4, §4.5).

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::activation::Activation;
use super::circuit::{CircuitBreaker, RateLimitOutcome, RateLimiter};
use super::keyed_lock::ActivationLockStripes;
use super::lifecycle::ActivationStatus;
use super::reentrant::ReentrantGate;
use crate::mailbox::{BoundedMailbox, BoundedMailboxSender, MailboxError, MailboxReceiver, MailboxSender};
use crate::message::{Envelope, EnvelopeError, StatusCode};
use crate::system::{CircuitBreakerConfig, RateLimitConfig, SiloConfig, DEFAULT_MAILBOX_CAPACITY};
use crate::typeregistry::TypeRegistry;
use crate::util::{ActorKey, ChainId, EnvelopeId, EnvelopeIdGenerator, SiloId};

/// One activated actor plus everything its dispatch path needs: the
/// chain-aware admission gate, its mailbox sender, the correlation table
/// matching a queued envelope back to the caller awaiting its response,
/// and its own circuit breaker and rate limiter (§4.4).
///
/// The mailbox's receiving half is owned by `executor`, a dedicated task
/// spawned in [`ActivatorManager::get_or_activate`] that is the only
/// reader draining this activation's turns.
pub struct ActivationEntry {
    gate: Arc<ReentrantGate<Activation>>,
    mailbox_tx: BoundedMailboxSender,
    pending: Arc<DashMap<EnvelopeId, oneshot::Sender<Envelope>>>,
    envelope_ids: EnvelopeIdGenerator,
    circuit: Arc<CircuitBreaker>,
    rate_limiter: RateLimiter,
    reentrant: bool,
    executor: JoinHandle<()>,
}

impl Drop for ActivationEntry {
    fn drop(&mut self) {
        self.executor.abort();
    }
}

/// Handle to one activated actor, shared between the manager's table and
/// whichever call is currently dispatching against it.
pub type ActivationHandle = Arc<ActivationEntry>;

/// The activation table for one silo: at most one live [`Activation`] per
/// [`ActorKey`] at any time (§3, §4.5 invariant).
pub struct ActivatorManager {
    silo_id: SiloId,
    activations: DashMap<ActorKey, ActivationHandle>,
    locks: ActivationLockStripes,
    registry: Arc<TypeRegistry>,
    idle_timeout: Duration,
    mailbox_capacity: usize,
    reentrant: bool,
    circuit_breaker: CircuitBreakerConfig,
    rate_limit: RateLimitConfig,
}

impl ActivatorManager {
    /// Create a manager for `silo_id`, constructing actors via `registry`
    /// and reclaiming activations idle longer than `idle_timeout`. Mailbox
    /// capacity, reentrancy, the circuit breaker, and rate limiting all
    /// take their defaults; use [`Self::with_config`] to wire them from a
    /// [`SiloConfig`] instead.
    pub fn new(silo_id: SiloId, registry: Arc<TypeRegistry>, idle_timeout: Duration) -> Self {
        Self {
            silo_id,
            activations: DashMap::new(),
            locks: ActivationLockStripes::default(),
            registry,
            idle_timeout,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            reentrant: false,
            circuit_breaker: CircuitBreakerConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Create a manager wired from a silo's full configuration, so
    /// `mailbox_capacity`, `reentrant`, `circuit_breaker`, and `rate_limit`
    /// all govern real traffic rather than just construction defaults.
    pub fn with_config(silo_id: SiloId, registry: Arc<TypeRegistry>, config: &SiloConfig) -> Self {
        Self {
            silo_id,
            activations: DashMap::new(),
            locks: ActivationLockStripes::default(),
            registry,
            idle_timeout: config.idle_timeout,
            mailbox_capacity: config.mailbox_capacity,
            reentrant: config.reentrant,
            circuit_breaker: config.circuit_breaker,
            rate_limit: config.rate_limit,
        }
    }

    /// Number of currently tracked activations (includes non-`Running` ones).
    pub fn activation_count(&self) -> usize {
        self.activations.len()
    }

    /// Look up an existing activation, or construct and activate a new one
    /// (§4.5: lazy activation, at-most-one-activation enforced by the
    /// striped lock around the check-then-insert). Spawns the single
    /// executor task that drains the activation's mailbox for its lifetime.
    pub async fn get_or_activate(&self, key: &ActorKey) -> Result<ActivationHandle, EnvelopeError> {
        if let Some(existing) = self.activations.get(key) {
            return Ok(existing.clone());
        }

        let _guard = self.locks.lock(key).await;

        // Re-check after acquiring the stripe: another task may have won the race.
        if let Some(existing) = self.activations.get(key) {
            return Ok(existing.clone());
        }

        let actor = self
            .registry
            .construct(&key.type_id)
            .map_err(|_| EnvelopeError::UnknownType(key.type_id.clone()))?;

        let mut activation = Activation::new(key.clone(), actor);
        activation.transition_to(ActivationStatus::Activating);

        let ctx = activation.context(self.silo_id.clone());
        activation
            .actor_mut()
            .on_activate(&ctx)
            .await
            .map_err(|err| EnvelopeError::ActivationFailure(key.clone(), err.to_string()))?;

        activation.transition_to(ActivationStatus::Running);
        debug!(actor = %key, "activated");

        let gate = Arc::new(ReentrantGate::new(activation));
        let circuit = Arc::new(CircuitBreaker::new(self.circuit_breaker));
        let pending = Arc::new(DashMap::new());
        let (mailbox, mailbox_tx) = BoundedMailbox::new(self.mailbox_capacity);

        let executor = tokio::spawn(run_executor(
            key.clone(),
            self.silo_id.clone(),
            Arc::clone(&gate),
            Arc::clone(&circuit),
            Arc::clone(&pending),
            mailbox,
        ));

        let handle = Arc::new(ActivationEntry {
            gate,
            mailbox_tx,
            pending,
            envelope_ids: EnvelopeIdGenerator::new(),
            circuit,
            rate_limiter: RateLimiter::new(self.rate_limit),
            reentrant: self.reentrant,
            executor,
        });
        self.activations.insert(key.clone(), handle.clone());
        Ok(handle)
    }

    /// Dispatch one turn against the target of `request` (§3 mailbox turn,
    /// §4.4, §7 error mapping).
    ///
    /// Order of checks: the circuit breaker, then whether this call is a
    /// reentrant self-call sharing the chain id already running (bypassing
    /// the mailbox entirely if `reentrant` allows it, rejected outright as
    /// a would-be deadlock if it doesn't), then the rate limiter, and
    /// finally the bounded mailbox itself, whose executor task is the only
    /// thing that ever calls into the actor for a fresh turn.
    pub async fn local_dispatch(&self, request: &Envelope) -> Envelope {
        let handle = match self.get_or_activate(&request.target).await {
            Ok(handle) => handle,
            Err(err) => return request.respond_error(err.status_code(), err.to_string()),
        };

        if !handle.circuit.allow() {
            let err = EnvelopeError::RejectedByMailbox(
                request.target.clone(),
                "circuit breaker open".to_string(),
            );
            return request.respond_error(err.status_code(), err.to_string());
        }

        if handle.gate.is_holder(request.chain_id) {
            if !handle.reentrant {
                let err = EnvelopeError::RejectedByMailbox(
                    request.target.clone(),
                    "reentrant call rejected: activation does not allow reentrancy".to_string(),
                );
                return request.respond_error(err.status_code(), err.to_string());
            }
            // Same chain already holds the gate: admit inline instead of
            // enqueueing, or this call would wait behind its own caller.
            return execute_turn(&request.target, &self.silo_id, &handle.gate, &handle.circuit, request).await;
        }

        if handle.rate_limiter.check() == RateLimitOutcome::Reject {
            let err = EnvelopeError::RejectedByMailbox(
                request.target.clone(),
                "rate limit exceeded".to_string(),
            );
            return request.respond_error(err.status_code(), err.to_string());
        }

        // The wire-supplied envelope id defaults to 0 and is not guaranteed
        // unique across concurrently in-flight calls; mint a fresh one to
        // key this activation's pending-response correlation table.
        let envelope_id = handle.envelope_ids.next();
        let (response_tx, response_rx) = oneshot::channel();
        handle.pending.insert(envelope_id, response_tx);

        let queued = request.clone().with_envelope_id(envelope_id);
        if let Err(err) = handle.mailbox_tx.send(queued).await {
            handle.pending.remove(&envelope_id);
            let mapped = map_mailbox_error(&request.target, err);
            return request.respond_error(mapped.status_code(), mapped.to_string());
        }

        let result = match request.time_remaining() {
            Some(remaining) => match tokio::time::timeout(remaining, response_rx).await {
                Ok(Ok(response)) => Ok(response),
                Ok(Err(_)) => Err(pending_dropped(&request.target)),
                Err(_) => {
                    handle.pending.remove(&envelope_id);
                    Err(EnvelopeError::DeadlineExceeded(request.target.clone()))
                }
            },
            None => response_rx.await.map_err(|_| pending_dropped(&request.target)),
        };

        match result {
            Ok(response) => response,
            Err(err) => request.respond_error(err.status_code(), err.to_string()),
        }
    }

    /// Deactivate `key`: stop its executor, call `on_deactivate`, and
    /// remove it from the table. Returns `Ok(())` even if `key` was not
    /// present.
    pub async fn deactivate(&self, key: &ActorKey) -> Result<(), EnvelopeError> {
        let Some((_, handle)) = self.activations.remove(key) else {
            return Ok(());
        };
        handle.executor.abort();

        let mut admission = handle.gate.acquire(ChainId::new()).await;
        admission.transition_to(ActivationStatus::Deactivating);
        let ctx = admission.context(self.silo_id.clone());
        admission
            .actor_mut()
            .on_deactivate(&ctx)
            .await
            .map_err(|err| EnvelopeError::ActivationFailure(key.clone(), err.to_string()))
    }

    /// Sweep all tracked activations and deactivate those idle longer than
    /// the configured timeout, returning the keys that were reclaimed
    /// (§4.5 "Idle GC"). An activation mid-turn is skipped for this pass
    /// rather than waited on.
    pub async fn sweep_idle(&self) -> Vec<ActorKey> {
        let idle_timeout = self.idle_timeout;
        let idle_keys: Vec<ActorKey> = self
            .activations
            .iter()
            .filter_map(|entry| {
                let idle = entry
                    .value()
                    .gate
                    .try_inspect(|activation| activation.is_idle(idle_timeout))
                    .unwrap_or(false);
                idle.then(|| entry.key().clone())
            })
            .collect();

        for key in &idle_keys {
            if let Err(err) = self.deactivate(key).await {
                warn!(actor = %key, error = %err, "idle deactivation failed");
            }
        }
        idle_keys
    }

    /// Status code corresponding to a successful response, for callers
    /// building their own synthetic error responses outside the dispatch path.
    pub fn status_ok() -> StatusCode {
        StatusCode::Ok
    }
}

/// Run one activation's turns one at a time, draining its mailbox until
/// the executor is aborted or the sender half is dropped.
async fn run_executor(
    key: ActorKey,
    silo_id: SiloId,
    gate: Arc<ReentrantGate<Activation>>,
    circuit: Arc<CircuitBreaker>,
    pending: Arc<DashMap<EnvelopeId, oneshot::Sender<Envelope>>>,
    mut mailbox: BoundedMailbox,
) {
    while let Some(envelope) = mailbox.recv().await {
        let correlation = envelope.envelope_id;
        let response = execute_turn(&key, &silo_id, &gate, &circuit, &envelope).await;
        if let Some((_, sender)) = pending.remove(&correlation) {
            let _ = sender.send(response);
        }
    }
}

/// Admit one turn and call the actor, shared by the executor loop and the
/// reentrant bypass path in [`ActivatorManager::local_dispatch`].
async fn execute_turn(
    key: &ActorKey,
    silo_id: &SiloId,
    gate: &ReentrantGate<Activation>,
    circuit: &CircuitBreaker,
    request: &Envelope,
) -> Envelope {
    let mut admission = gate.acquire(request.chain_id).await;

    if !admission.status().accepts_turns() {
        let err = EnvelopeError::RejectedByMailbox(
            key.clone(),
            format!("activation not running: {:?}", admission.status()),
        );
        return request.respond_error(err.status_code(), err.to_string());
    }

    let ctx = admission.context(silo_id.clone()).with_chain_id(request.chain_id);

    let result = admission
        .actor_mut()
        .handle_call(&request.method, request.payload.clone(), &ctx)
        .await;
    admission.touch();
    drop(admission);

    match result {
        Ok(payload) => {
            circuit.record_success();
            request.respond_ok(payload)
        }
        Err(err) => {
            circuit.record_failure();
            let fault = EnvelopeError::HandlerFault(key.clone(), err.to_string());
            request.respond_error(fault.status_code(), fault.to_string())
        }
    }
}

fn map_mailbox_error(target: &ActorKey, err: MailboxError) -> EnvelopeError {
    match err {
        MailboxError::Full { capacity } => {
            EnvelopeError::RejectedByMailbox(target.clone(), format!("mailbox full (capacity {capacity})"))
        }
        MailboxError::Closed => {
            EnvelopeError::RejectedByMailbox(target.clone(), "mailbox closed".to_string())
        }
        MailboxError::BackpressureApplied { strategy } => {
            EnvelopeError::RejectedByMailbox(target.clone(), format!("backpressure applied: {strategy}"))
        }
        MailboxError::DeadlineExceeded { .. } => EnvelopeError::DeadlineExceeded(target.clone()),
    }
}

fn pending_dropped(target: &ActorKey) -> EnvelopeError {
    EnvelopeError::RejectedByMailbox(target.clone(), "activation dropped the pending response".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::{ActivationContext, Actor, ActorError};
    use crate::util::TypeId;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct Echo;

    #[async_trait]
    impl Actor for Echo {
        async fn handle_call(
            &mut self,
            method: &str,
            payload: Vec<u8>,
            _ctx: &ActivationContext,
        ) -> Result<Vec<u8>, ActorError> {
            match method {
                "echo" => Ok(payload),
                _ => Err(ActorError::from("unknown method")),
            }
        }
    }

    fn manager() -> ActivatorManager {
        let registry = Arc::new(TypeRegistry::new());
        registry.register(TypeId::new("Echo"), || Box::new(Echo));
        ActivatorManager::new(SiloId::new("silo-A"), registry, Duration::from_secs(60))
    }

    fn key() -> ActorKey {
        ActorKey::new(TypeId::new("Echo"), "e1")
    }

    #[tokio::test]
    async fn get_or_activate_creates_then_reuses() {
        let manager = manager();
        let first = manager.get_or_activate(&key()).await.unwrap();
        let second = manager.get_or_activate(&key()).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.activation_count(), 1);
    }

    #[tokio::test]
    async fn unknown_type_is_a_routing_error() {
        let manager = manager();
        let bad_key = ActorKey::new(TypeId::new("Missing"), "x");
        let err = manager.get_or_activate(&bad_key).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn local_dispatch_echoes_payload() {
        let manager = manager();
        let request = Envelope::request(key(), "echo", vec![9, 9]);
        let response = manager.local_dispatch(&request).await;
        assert_eq!(response.status_code, StatusCode::Ok);
        assert_eq!(response.payload, vec![9, 9]);
    }

    #[tokio::test]
    async fn local_dispatch_maps_handler_error_to_handler_fault() {
        let manager = manager();
        let request = Envelope::request(key(), "bogus", vec![]);
        let response = manager.local_dispatch(&request).await;
        assert_eq!(response.status_code, StatusCode::HandlerFault);
    }

    #[tokio::test]
    async fn deactivate_removes_from_table() {
        let manager = manager();
        manager.get_or_activate(&key()).await.unwrap();
        manager.deactivate(&key()).await.unwrap();
        assert_eq!(manager.activation_count(), 0);
    }

    #[tokio::test]
    async fn sweep_idle_reclaims_nothing_under_timeout() {
        let manager = manager();
        manager.get_or_activate(&key()).await.unwrap();
        let reclaimed = manager.sweep_idle().await;
        assert!(reclaimed.is_empty());
    }

    struct Blocker {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Actor for Blocker {
        async fn handle_call(
            &mut self,
            _method: &str,
            payload: Vec<u8>,
            _ctx: &ActivationContext,
        ) -> Result<Vec<u8>, ActorError> {
            self.gate.notified().await;
            Ok(payload)
        }
    }

    fn blocked_manager(mailbox_capacity: usize) -> (ActivatorManager, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let registry = Arc::new(TypeRegistry::new());
        let factory_gate = Arc::clone(&gate);
        registry.register(TypeId::new("Blocker"), move || {
            Box::new(Blocker {
                gate: Arc::clone(&factory_gate),
            })
        });
        let config = SiloConfig::builder().with_mailbox_capacity(mailbox_capacity).build().unwrap();
        let manager = ActivatorManager::with_config(SiloId::new("silo-A"), registry, &config);
        (manager, gate)
    }

    #[tokio::test]
    async fn mailbox_capacity_rejects_calls_once_full() {
        let (manager, gate) = blocked_manager(1);
        let blocker_key = ActorKey::new(TypeId::new("Blocker"), "b1");

        // First call is admitted into the executor and blocks inside the
        // handler; the second fills the bounded queue behind it; the third
        // has nowhere to go and must be rejected by the mailbox.
        let first = {
            let manager = &manager;
            let request = Envelope::request(blocker_key.clone(), "hold", vec![]);
            tokio::spawn(async move { manager.local_dispatch(&request).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = {
            let manager = &manager;
            let request = Envelope::request(blocker_key.clone(), "hold", vec![]);
            tokio::spawn(async move { manager.local_dispatch(&request).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let third_request = Envelope::request(blocker_key, "hold", vec![]);
        let third = manager.local_dispatch(&third_request).await;
        assert_eq!(third.status_code, StatusCode::RejectedByMailbox);

        // `notify_one` stores a permit if nobody is parked yet, so this
        // releases each blocked turn in order regardless of exactly when
        // the executor reaches its next `notified().await`.
        gate.notify_one();
        first.await.unwrap();
        gate.notify_one();
        second.await.unwrap();
    }

    struct ReentrantCounter {
        manager: Arc<ActivatorManager>,
        key: ActorKey,
    }

    #[async_trait]
    impl Actor for ReentrantCounter {
        async fn handle_call(
            &mut self,
            method: &str,
            payload: Vec<u8>,
            ctx: &ActivationContext,
        ) -> Result<Vec<u8>, ActorError> {
            match method {
                "outer" => {
                    let inner = Envelope::request(self.key.clone(), "inner", payload)
                        .with_chain_id(ctx.chain_id());
                    let response = self.manager.local_dispatch(&inner).await;
                    if response.status_code != StatusCode::Ok {
                        return Err(ActorError::from(response.error_message.unwrap_or_default()));
                    }
                    Ok(response.payload)
                }
                "inner" => Ok(payload),
                other => Err(ActorError::from(format!("unknown method {other}"))),
            }
        }
    }

    #[tokio::test]
    async fn reentrant_self_call_completes_without_hanging() {
        let registry = Arc::new(TypeRegistry::new());
        let counter_key = ActorKey::new(TypeId::new("ReentrantCounter"), "r1");
        let config = SiloConfig::builder().with_reentrant(true).build().unwrap();
        let manager = Arc::new(ActivatorManager::with_config(
            SiloId::new("silo-A"),
            Arc::clone(&registry),
            &config,
        ));

        let factory_manager = Arc::clone(&manager);
        let factory_key = counter_key.clone();
        registry.register(TypeId::new("ReentrantCounter"), move || {
            Box::new(ReentrantCounter {
                manager: Arc::clone(&factory_manager),
                key: factory_key.clone(),
            })
        });

        let request = Envelope::request(counter_key, "outer", vec![1, 2, 3]);
        let response = tokio::time::timeout(Duration::from_secs(1), manager.local_dispatch(&request))
            .await
            .expect("reentrant call must not hang");
        assert_eq!(response.status_code, StatusCode::Ok);
        assert_eq!(response.payload, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn non_reentrant_self_call_is_rejected_instead_of_hanging() {
        let registry = Arc::new(TypeRegistry::new());
        let counter_key = ActorKey::new(TypeId::new("ReentrantCounter"), "r1");
        let manager = Arc::new(ActivatorManager::new(
            SiloId::new("silo-A"),
            Arc::clone(&registry),
            Duration::from_secs(60),
        ));

        let factory_manager = Arc::clone(&manager);
        let factory_key = counter_key.clone();
        registry.register(TypeId::new("ReentrantCounter"), move || {
            Box::new(ReentrantCounter {
                manager: Arc::clone(&factory_manager),
                key: factory_key.clone(),
            })
        });

        let request = Envelope::request(counter_key, "outer", vec![1]);
        let response = tokio::time::timeout(Duration::from_secs(1), manager.local_dispatch(&request))
            .await
            .expect("non-reentrant deadlock must be detected, not hung on");
        assert_eq!(response.status_code, StatusCode::RejectedByMailbox);
    }

    struct Faulty;

    #[async_trait]
    impl Actor for Faulty {
        async fn handle_call(
            &mut self,
            _method: &str,
            _payload: Vec<u8>,
            _ctx: &ActivationContext,
        ) -> Result<Vec<u8>, ActorError> {
            Err(ActorError::from("boom"))
        }
    }

    #[tokio::test]
    async fn circuit_breaker_opens_then_recovers_then_reopens_on_fault() {
        let registry = Arc::new(TypeRegistry::new());
        registry.register(TypeId::new("Faulty"), || Box::new(Faulty));
        let config = SiloConfig::builder()
            .with_circuit_breaker(CircuitBreakerConfig {
                enabled: true,
                failure_threshold: 3,
                success_threshold: 2,
                open_timeout: Duration::from_millis(100),
                sampling_window: Duration::from_secs(60),
            })
            .build()
            .unwrap();
        let manager = ActivatorManager::with_config(SiloId::new("silo-A"), registry, &config);
        let faulty_key = ActorKey::new(TypeId::new("Faulty"), "f1");

        for _ in 0..3 {
            let request = Envelope::request(faulty_key.clone(), "call", vec![]);
            let response = manager.local_dispatch(&request).await;
            assert_eq!(response.status_code, StatusCode::HandlerFault);
        }

        // Breaker is now open: rejected without even reaching the actor.
        let request = Envelope::request(faulty_key.clone(), "call", vec![]);
        let response = manager.local_dispatch(&request).await;
        assert_eq!(response.status_code, StatusCode::RejectedByMailbox);

        tokio::time::sleep(Duration::from_millis(120)).await;

        // A third immediate fault during the half-open trial reopens it.
        let request = Envelope::request(faulty_key.clone(), "call", vec![]);
        let response = manager.local_dispatch(&request).await;
        assert_eq!(response.status_code, StatusCode::HandlerFault);

        let request = Envelope::request(faulty_key, "call", vec![]);
        let response = manager.local_dispatch(&request).await;
        assert_eq!(response.status_code, StatusCode::RejectedByMailbox);
    }
}
