//! [`Silo`]: the process-level entry point that wires together membership,
//! placement, routing, and activation for one node in the cluster.

// Layer 1: Standard library
use std::sync::Arc;

// Layer 2: Third-party
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};
use uuid::Uuid;

// Layer 3: Internal
use super::{SiloConfig, SiloError};
use crate::activator::ActivatorManager;
use crate::broker::{EnvelopeRouter, LocalRouter};
use crate::directory::ActorDirectory;
use crate::dlq::DeadLetterQueue;
use crate::membership::{HealthMonitor, MembershipRegistry, SiloRecord};
use crate::message::Envelope;
use crate::ring::ConsistentHashRing;
use crate::typeregistry::TypeRegistry;
use crate::util::SiloId;

/// Lifecycle state of a running silo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiloState {
    Running,
    ShuttingDown,
    Stopped,
}

struct Background {
    heartbeat: JoinHandle<()>,
    gc: JoinHandle<()>,
    health_sweep: JoinHandle<()>,
}

/// A single node in the cluster: owns the membership record, the hash ring,
/// the actor directory, the activation table, and the envelope router.
///
/// # Examples
///
/// ```rust,ignore
/// use silo_rt::{Silo, SiloConfig, TypeId};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let silo = Silo::new(SiloConfig::default());
/// silo.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct Silo {
    self_id: SiloId,
    config: SiloConfig,
    type_registry: Arc<TypeRegistry>,
    membership: Arc<MembershipRegistry>,
    health_monitor: Arc<HealthMonitor>,
    ring: Arc<ConsistentHashRing>,
    directory: Arc<ActorDirectory>,
    activator: Arc<ActivatorManager>,
    router: Arc<LocalRouter>,
    dead_letters: Arc<DeadLetterQueue>,
    state: RwLock<SiloState>,
    background: RwLock<Option<Background>>,
}

impl Silo {
    /// Build a silo from `config`. Nothing runs until [`Silo::start`] is called.
    pub fn new(config: SiloConfig) -> Self {
        let self_id = config
            .silo_id
            .clone()
            .map(SiloId::new)
            .unwrap_or_else(|| SiloId::new(Uuid::new_v4().to_string()));

        let type_registry = Arc::new(TypeRegistry::new());
        let membership = Arc::new(MembershipRegistry::new(config.heartbeat_timeout));
        let health_monitor = Arc::new(
            HealthMonitor::new(self_id.clone(), config.eviction_policy)
                .with_consecutive_unhealthy_threshold(config.consecutive_unhealthy_checks),
        );
        let ring = Arc::new(ConsistentHashRing::new(config.virtual_nodes_per_silo));
        ring.insert(self_id.clone());
        let directory = Arc::new(ActorDirectory::new(Arc::clone(&ring)));
        let activator = Arc::new(ActivatorManager::with_config(
            self_id.clone(),
            Arc::clone(&type_registry),
            &config,
        ));
        let dead_letters = Arc::new(DeadLetterQueue::new(config.dead_letter_capacity));
        let router = Arc::new(LocalRouter::new(
            self_id.clone(),
            Arc::clone(&directory),
            Arc::clone(&activator),
            crate::broker::UnreachableTransport,
            Arc::clone(&dead_letters),
        ));

        Self {
            self_id,
            config,
            type_registry,
            membership,
            health_monitor,
            ring,
            directory,
            activator,
            router,
            dead_letters,
            state: RwLock::new(SiloState::Stopped),
            background: RwLock::new(None),
        }
    }

    /// This silo's own identity on the ring and in the membership registry.
    pub fn id(&self) -> &SiloId {
        &self.self_id
    }

    /// The registry actor types are registered against before startup.
    pub fn type_registry(&self) -> &TypeRegistry {
        &self.type_registry
    }

    /// The cluster membership registry, shared across every silo in the ring.
    pub fn membership(&self) -> &MembershipRegistry {
        &self.membership
    }

    /// The consistent hash ring used to place actor keys onto silos.
    pub fn ring(&self) -> &ConsistentHashRing {
        &self.ring
    }

    /// The actor-to-silo directory consulted by the router.
    pub fn directory(&self) -> &ActorDirectory {
        &self.directory
    }

    /// Number of activations currently live on this silo.
    pub fn activation_count(&self) -> usize {
        self.activator.activation_count()
    }

    /// Envelopes that exhausted routing retries or targeted a silo that never answered.
    pub fn dead_letters(&self) -> &DeadLetterQueue {
        &self.dead_letters
    }

    /// Dispatch `envelope`, resolving its target locally or over the wire.
    pub async fn dispatch(&self, envelope: Envelope) -> Envelope {
        self.router.route(envelope).await
    }

    /// Join the cluster, start the heartbeat loop and the idle-activation GC sweep.
    ///
    /// # Errors
    /// Returns [`SiloError::MembershipJoinFailed`] if this silo's own record
    /// cannot be registered (e.g. a duplicate id already present and active).
    pub async fn start(&self) -> Result<(), SiloError> {
        {
            let mut state = self.state.write();
            if *state != SiloState::Stopped {
                return Err(SiloError::ShuttingDown);
            }
            *state = SiloState::Running;
        }

        let record = SiloRecord::new(
            self.self_id.clone(),
            self.self_id.as_str(),
            self.config.region_id.clone(),
            self.config.zone_id.clone(),
        );
        self.membership.register(record)?;
        info!(silo = %self.self_id, "joined cluster membership");

        let heartbeat = self.spawn_heartbeat_loop();
        let gc = self.spawn_gc_loop();
        let health_sweep = self.spawn_health_sweep_loop();
        *self.background.write() = Some(Background {
            heartbeat,
            gc,
            health_sweep,
        });

        Ok(())
    }

    fn spawn_heartbeat_loop(&self) -> JoinHandle<()> {
        let membership = Arc::clone(&self.membership);
        let self_id = self.self_id.clone();
        let period = self.config.heartbeat_interval;
        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                if membership.refresh(&self_id).is_err() {
                    warn!(silo = %self_id, "heartbeat refresh failed, record may have been evicted");
                    break;
                }
                debug!(silo = %self_id, "heartbeat sent");
            }
        })
    }

    fn spawn_health_sweep_loop(&self) -> JoinHandle<()> {
        let membership = Arc::clone(&self.membership);
        let health_monitor = Arc::clone(&self.health_monitor);
        let period = self.config.heartbeat_timeout;
        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                let evicted = health_monitor.sweep(&membership);
                if !evicted.is_empty() {
                    debug!(count = evicted.len(), "evicted unhealthy peers");
                }
            }
        })
    }

    fn spawn_gc_loop(&self) -> JoinHandle<()> {
        let activator = Arc::clone(&self.activator);
        let idle_timeout = self.config.idle_timeout;
        tokio::spawn(async move {
            let mut ticker = interval(idle_timeout.max(std::time::Duration::from_secs(1)));
            loop {
                ticker.tick().await;
                let swept = activator.sweep_idle().await;
                if !swept.is_empty() {
                    debug!(count = swept.len(), "swept idle activations");
                }
            }
        })
    }

    /// Gracefully leave the cluster: stop background tasks, deregister from
    /// membership, and wait up to `SiloConfig::shutdown_timeout` for
    /// outstanding activations to drain.
    ///
    /// # Errors
    /// Returns [`SiloError::ShutdownTimeout`] if activations are still live
    /// once the timeout elapses.
    pub async fn stop(&self) -> Result<(), SiloError> {
        {
            let mut state = self.state.write();
            if *state != SiloState::Running {
                return Err(SiloError::ShuttingDown);
            }
            *state = SiloState::ShuttingDown;
        }

        if let Some(background) = self.background.write().take() {
            background.heartbeat.abort();
            background.gc.abort();
            background.health_sweep.abort();
        }

        let _ = self.membership.unregister(&self.self_id);

        let result = tokio::time::timeout(self.config.shutdown_timeout, self.wait_for_drain()).await;

        match result {
            Ok(()) => {
                *self.state.write() = SiloState::Stopped;
                Ok(())
            }
            Err(_) => Err(SiloError::ShutdownTimeout(self.config.shutdown_timeout)),
        }
    }

    async fn wait_for_drain(&self) {
        loop {
            if self.activator.activation_count() == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    /// Whether the silo is shutting down or has stopped.
    pub fn is_shutting_down(&self) -> bool {
        *self.state.read() != SiloState::Running
    }
}
