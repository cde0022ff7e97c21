//! Wire envelope and error taxonomy for calls between activations (§3, §7).
//!
//! An [`Envelope`] is the unit the router and mailbox move around: a call
//! going out carries `target`/`method`/`payload`; the matching response
//! carries the same `envelope_id` plus a [`StatusCode`]. Handler-level
//! errors are represented as [`EnvelopeError`] and mapped to a `StatusCode`
//! rather than unwound as exceptions (§9).

pub mod envelope;
pub mod status;

pub use envelope::Envelope;
pub use status::{EnvelopeError, StatusCode};
