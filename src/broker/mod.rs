//! Location-transparent envelope routing: local fast-path and remote transport (§4.6).
//!
//! [`EnvelopeRouter`] is the single entry point a caller uses to dispatch a
//! call: it asks the [`crate::directory::ActorDirectory`] who owns the
//! target, then either short-circuits to the local [`crate::activator::ActivatorManager`]
//! (no serialization) or hands the envelope to a [`RemoteTransport`] for the
//! owning silo.
//!
//! # Modules
//!
//! - [`error`]: `BrokerError`, the router's own failure taxonomy
//! - [`traits`]: the `EnvelopeRouter` trait
//! - [`local`]: `LocalRouter`, the default implementation
//! - [`transport`]: the pluggable `RemoteTransport` seam for cross-silo delivery

pub mod error;
pub mod local;
pub mod traits;
pub mod transport;

pub use error::BrokerError;
pub use local::LocalRouter;
pub use traits::EnvelopeRouter;
pub use transport::{RemoteTransport, UnreachableTransport};
