//! Per-activation turn queue with backpressure control (§3, §6).
//!
//! Every running [`crate::activator::Activation`] owns exactly one
//! [`BoundedMailbox`]: fresh calls from the router enqueue onto it, and a
//! single executor task drains it and dispatches each
//! [`crate::message::Envelope`] to the actor, one turn at a time. A
//! reentrant call sharing the chain id already running bypasses the
//! mailbox entirely rather than enqueuing behind itself.
//!
//! # Components
//!
//! - [`MailboxReceiver`] / [`MailboxSender`] - queue endpoints
//! - [`BoundedMailbox`] / [`BoundedMailboxSender`] - the default implementation
//! - [`BackpressureStrategy`] - flow control when the queue is full
//! - [`metrics`] - pluggable send/receive/drop counters

pub mod backpressure;
pub mod bounded;
pub mod metrics;
pub mod traits;

pub use backpressure::BackpressureStrategy;
pub use bounded::{BoundedMailbox, BoundedMailboxSender};
pub use metrics::{AtomicMetrics, MetricsRecorder};
pub use traits::{MailboxCapacity, MailboxError, MailboxReceiver, MailboxSender, TryRecvError};
