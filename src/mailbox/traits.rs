//! Core mailbox traits for per-activation turn queuing.
//!
//! The mailbox serializes fresh turns for one [`crate::activator::Activation`]:
//! envelopes queue here before its single executor task dequeues one at a
//! time and dispatches it to the actor (§3, §4.4). A reentrant call sharing
//! the chain id already running is admitted directly instead of going
//! through the mailbox. Unlike the rest of this crate, these traits are not
//! generic over a payload type: every mailbox moves concrete
//! [`crate::message::Envelope`] values, since that's the only unit that ever
//! crosses this boundary.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
use crate::message::Envelope;

/// Receiving half of a mailbox, owned exclusively by the worker draining it.
#[async_trait]
pub trait MailboxReceiver: Send + Sync {
    /// Error type for mailbox operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Receive the next envelope, or `None` once the mailbox is closed and drained.
    async fn recv(&mut self) -> Option<Envelope>;

    /// Try to receive without blocking.
    fn try_recv(&mut self) -> Result<Envelope, TryRecvError>;

    /// This mailbox's capacity configuration.
    fn capacity(&self) -> MailboxCapacity;

    /// Approximate number of envelopes currently queued.
    fn len(&self) -> usize;

    /// Whether the mailbox is currently empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sending half of a mailbox; cloneable so multiple concurrent callers can
/// enqueue fresh turns onto the same activation.
#[async_trait]
pub trait MailboxSender: Send + Sync + Clone {
    /// Error type for send operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Enqueue `envelope`, applying the mailbox's backpressure strategy if full.
    async fn send(&self, envelope: Envelope) -> Result<(), Self::Error>;

    /// Enqueue without waiting; fails immediately if the mailbox is full or closed.
    fn try_send(&self, envelope: Envelope) -> Result<(), Self::Error>;
}

/// Mailbox capacity configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxCapacity {
    /// Fixed maximum queue depth.
    Bounded(usize),
}

/// Mailbox error types.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// Mailbox is full (§7 `RejectedByMailbox`).
    #[error("mailbox is full (capacity: {capacity})")]
    Full { capacity: usize },

    /// The receiving half has been dropped.
    #[error("mailbox is closed")]
    Closed,

    /// The configured backpressure strategy rejected this send.
    #[error("backpressure applied: {strategy:?}")]
    BackpressureApplied {
        strategy: crate::mailbox::BackpressureStrategy,
    },

    /// The envelope's deadline elapsed before it could be dispatched (§3).
    #[error("deadline exceeded at {deadline}")]
    DeadlineExceeded { deadline: DateTime<Utc> },
}

/// Non-blocking receive error types.
#[derive(Debug, thiserror::Error)]
pub enum TryRecvError {
    /// No envelopes are currently queued.
    #[error("mailbox is empty")]
    Empty,

    /// The sending half has been dropped and the queue is drained.
    #[error("mailbox is closed")]
    Closed,
}
