//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for
//! building on silo-rt. Import this module to get started quickly:
//!
//! ```rust
//! use silo_rt::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Activation
//! - [`Actor`] - trait implemented by actor handlers
//! - [`ActivationContext`] - identity and chain-id passed to every hook
//! - [`ActorError`] - error type returned from `Actor` hooks
//! - [`ErrorAction`] - supervision decision enum
//!
//! ## Messaging
//! - [`Envelope`] - the wire call/response unit
//! - [`StatusCode`] / [`EnvelopeError`] - the error taxonomy
//!
//! ## Mailbox
//! - [`BoundedMailbox`] - capacity-limited per-activation turn queue
//! - [`BackpressureStrategy`] - flow control strategies
//! - [`MailboxReceiver`] / [`MailboxSender`] - queue endpoints
//!
//! ## Cluster
//! - [`MembershipRegistry`] - heartbeat-tracked silo membership
//! - [`ConsistentHashRing`] - key placement
//! - [`ActorDirectory`] - actor-to-silo lookup with migration overrides
//!
//! ## Supervision
//! - [`Supervisor`] / [`SupervisorTree`] - supervision tree
//! - [`OneForOne`] / [`OneForAll`] / [`RestForOne`] - restart strategies
//! - [`RestartPolicy`] / [`ShutdownPolicy`] / [`ChildSpec`] / [`ChildHealth`] / [`ChildState`]
//!
//! ## Monitoring
//! - [`Monitor`] / [`InMemoryMonitor`] / [`NoopMonitor`]
//! - [`MonitoringEvent`] / [`EventSeverity`]
//!
//! ## System
//! - [`Silo`] - process lifecycle
//! - [`SiloConfig`] - configuration
//!
//! ## Utilities
//! - [`SiloId`] / [`TypeId`] / [`ActorKey`] / [`ChainId`] / [`ChildId`]

// Activation
pub use crate::activator::{Actor, ActivationContext, ActorError, ErrorAction};

// Messaging
pub use crate::message::{Envelope, EnvelopeError, StatusCode};

// Mailbox
pub use crate::mailbox::{
    BackpressureStrategy, BoundedMailbox, BoundedMailboxSender, MailboxReceiver, MailboxSender,
};

// Routing
pub use crate::broker::{EnvelopeRouter, LocalRouter};

// Cluster
pub use crate::directory::ActorDirectory;
pub use crate::membership::MembershipRegistry;
pub use crate::ring::ConsistentHashRing;

// Supervision
pub use crate::supervisor::{
    ChildHealth, ChildSpec, ChildState, OneForAll, OneForOne, RestForOne, RestartPolicy,
    ShutdownPolicy, Supervisor, SupervisorTree,
};

// Monitoring
pub use crate::monitoring::{EventSeverity, InMemoryMonitor, Monitor, MonitoringEvent, NoopMonitor};

// System
pub use crate::system::{Silo, SiloConfig};

// Utilities
pub use crate::util::{ActorKey, ChainId, ChildId, SiloId, TypeId};
