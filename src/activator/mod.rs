//! Activation lifecycle: the `Actor` trait, per-activation context, the
//! `Created -> Activating -> Running -> Deactivating` state machine, and
//! the manager that owns the silo-local activation table (§3, §4.5, §9).
//!
//! # Components
//!
//! - [`Actor`] - trait implemented by user handlers, dispatched by method name
//! - [`ActivationContext`] - identity and chain-id metadata for one activation
//! - [`ActivationLifecycle`] / [`ActivationStatus`] - state machine and idle tracking
//! - [`Activation`] - one running instance: key, boxed actor, lifecycle, children
//! - [`ActivatorManager`] - the activation table: lookup-or-activate, dispatch, idle GC sweep
//! - [`ErrorAction`] - supervision decision returned from `on_child_failure`
//!
//! # Module Organization
//!
//! This mod.rs file contains ONLY module declarations and re-exports.
//!
//! - `traits.rs` - `Actor` trait, `ActorError`, `ErrorAction`
//! - `context.rs` - `ActivationContext`
//! - `lifecycle.rs` - `ActivationStatus`, `ActivationLifecycle`
//! - `activation.rs` - `Activation`
//! - `manager.rs` - `ActivatorManager`
//! - `keyed_lock.rs` - striped lock guaranteeing at-most-one-activation
//! - `reentrant.rs` - chain-aware turn admission used internally by `manager.rs`
//! - `circuit.rs` - per-activation circuit breaker and rate limiter, used internally by `manager.rs`

pub mod activation;
pub mod context;
mod circuit;
pub mod keyed_lock;
pub mod lifecycle;
pub mod manager;
mod reentrant;
pub mod traits;

pub use activation::Activation;
pub use context::ActivationContext;
pub use keyed_lock::ActivationLockStripes;
pub use lifecycle::{ActivationLifecycle, ActivationStatus};
pub use manager::ActivatorManager;
pub use traits::{Actor, ActorError, ErrorAction};
