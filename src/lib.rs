//! # silo-rt - Distributed Virtual-Actor Runtime
//!
//! Cluster membership, consistent-hash placement, lazy virtual-actor
//! activation, location-transparent call routing, a versioned state store,
//! and BEAM-inspired supervision, for building fault-tolerant services where
//! actors are addressed by identity rather than pinned to a process.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use silo_rt::prelude::*;
//! use async_trait::async_trait;
//!
//! struct Counter { value: i64 }
//!
//! #[async_trait]
//! impl Actor for Counter {
//!     async fn handle_call(
//!         &mut self,
//!         method: &str,
//!         payload: Vec<u8>,
//!         _ctx: &ActivationContext,
//!     ) -> Result<Vec<u8>, ActorError> {
//!         match method {
//!             "inc" => { self.value += 1; Ok(self.value.to_le_bytes().to_vec()) }
//!             other => Err(ActorError::from(format!("unknown method {other}"))),
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SiloConfig::default();
//!     let silo = Silo::new(config);
//!     silo.type_registry().register(TypeId::new("Counter"), || Box::new(Counter { value: 0 }));
//!     silo.start().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Core Features
//!
//! ## Virtual Actors
//! - Lazy activation on first call; actors have no process affinity
//! - At-most-one-activation per key, enforced by a striped lock
//! - Idle activations are reclaimed by a periodic GC sweep
//!
//! ## Location Transparency
//! - Callers address an [`util::ActorKey`], never a network endpoint
//! - Local calls short-circuit to the activation table; remote calls are
//!   framed and shipped over the wire transparently
//!
//! ## Cluster Membership & Placement
//! - TTL heartbeats with join/leave events
//! - Consistent hash ring for stable placement across membership churn
//!
//! ## BEAM-Inspired Supervision
//! - Three strategies: OneForOne, OneForAll, RestForOne
//! - Directives: Resume, Restart, Stop, Escalate
//! - Exponential backoff between restarts
//!
//! # Module Organization
//!
//! ## Core Runtime
//! - [`activator`] - the `Actor` trait, activation lifecycle, and the activation table
//! - [`message`] - wire envelope and error taxonomy for calls between activations
//! - [`mailbox`] - per-activation turn queue with backpressure control
//! - [`broker`] - call routing: local fast-path and remote transport
//! - [`typeregistry`] - actor-type constructors keyed by type id
//!
//! ## Cluster
//! - [`membership`] - heartbeat registry and join/leave event stream
//! - [`ring`] - consistent hash ring for key placement
//! - [`directory`] - actor-to-silo mapping and sticky migration overrides
//! - [`store`] - versioned state store with optimistic concurrency
//!
//! ## Fault Tolerance
//! - [`supervisor`] - supervision trees and restart strategies
//! - [`monitoring`] - event tracking and metrics for observability
//!
//! ## Infrastructure
//! - [`system`] - silo configuration and process lifecycle
//! - [`util`] - identifiers (SiloId, TypeId, ActorKey, EnvelopeId, ChainId, ChildId)
//!
//! # Architecture Principles
//!
//! ## Separation of Concerns
//! - **Actor**: handler logic only, no knowledge of placement or routing
//! - **Activator**: owns the activation table and the lifecycle state machine
//! - **Router**: decides local vs. remote dispatch, hidden from actors
//! - **Mailbox**: per-activation turn serialization and backpressure
//!
//! ## Standards
//! - 3-layer import organization (std -> third-party -> internal)
//! - `chrono::DateTime<Utc>` for all timestamps
//! - `mod.rs` files contain only module declarations and re-exports
//! - `dyn Actor` is a deliberate exception to an otherwise generics-first style,
//!   needed because actor types are selected at runtime by string type id

pub mod activator;
pub mod broker;
pub mod directory;
pub mod dlq;
pub mod mailbox;
pub mod membership;
pub mod message;
pub mod monitoring;
pub mod ring;
pub mod store;
pub mod supervisor;
pub mod system;
pub mod typeregistry;
pub mod util;

// Re-export commonly used types
pub use activator::{
    Activation, ActivationContext, ActivationLifecycle, ActivationStatus, Actor, ActorError,
    ActivatorManager, ErrorAction,
};
pub use broker::{BrokerError, EnvelopeRouter, LocalRouter};
pub use directory::{ActorDirectory, MigrationOverride};
pub use dlq::{DeadLetter, DeadLetterQueue};
pub use mailbox::{
    BackpressureStrategy, BoundedMailbox, BoundedMailboxSender, MailboxReceiver, MailboxSender,
};
pub use membership::{MembershipEvent, MembershipRegistry, SiloRecord, SiloStatus};
pub use message::{Envelope, EnvelopeError, StatusCode};
pub use monitoring::{
    ActivationEvent, EventSeverity, InMemoryMonitor, Monitor, MonitoringConfig, MonitoringError,
    MonitoringEvent, MonitoringSnapshot, NoopMonitor, RouterEvent, SupervisionEvent, SystemEvent,
};
pub use ring::ConsistentHashRing;
pub use store::{InMemoryStateStore, StateRecord, StateStore, StoreError};
pub use supervisor::{
    ChildHealth, ChildSpec, ChildState, OneForAll, OneForOne, RestForOne, RestartBackoff,
    RestartPolicy, ShutdownPolicy, SupervisionDecision, SupervisionStrategy, Supervisor,
    SupervisorError, SupervisorTree,
};
pub use system::{Silo, SiloConfig, SiloError};
pub use typeregistry::{ActorFactory, TypeRegistry, UnknownTypeError};
pub use util::{ActorKey, ChainId, ChildId, EnvelopeId, EnvelopeIdGenerator, SiloId, TypeId};
