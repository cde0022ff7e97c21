//! Dead-letter queue for envelopes that could not be delivered (§5).
//!
//! A message lands here when it is rejected by a circuit breaker, a
//! rate-limiter, a stopped actor, or routing fails after its retry budget
//! is exhausted. DLQ operations are explicitly not part of the core hot
//! path: callers observe the original failure as a caller-visible error;
//! the queue exists for offline inspection and replay tooling.

// Layer 1: Standard library imports
use std::sync::Mutex;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
use crate::message::Envelope;

/// One envelope that could not be delivered, with the reason it was dropped.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub envelope: Envelope,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

impl DeadLetter {
    /// Record an envelope as dead, stamped with the current time.
    pub fn new(envelope: Envelope, reason: impl Into<String>) -> Self {
        Self {
            envelope,
            reason: reason.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// An append-only, bounded dead-letter log.
///
/// Backed by a plain `Mutex<Vec<_>>`: DLQ writes happen on the cold path
/// (only once delivery has already failed), so lock contention here is not
/// a design concern the way it is for the mailbox or activation table.
pub struct DeadLetterQueue {
    capacity: usize,
    letters: Mutex<Vec<DeadLetter>>,
}

impl DeadLetterQueue {
    /// Create a queue that retains at most `capacity` letters, dropping the
    /// oldest once full.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            letters: Mutex::new(Vec::new()),
        }
    }

    /// Record a dead envelope with `reason`.
    pub fn record(&self, envelope: Envelope, reason: impl Into<String>) {
        let mut letters = self.letters.lock().unwrap_or_else(|poison| poison.into_inner());
        if letters.len() >= self.capacity {
            letters.remove(0);
        }
        letters.push(DeadLetter::new(envelope, reason));
    }

    /// Number of letters currently retained.
    pub fn len(&self) -> usize {
        self.letters.lock().unwrap_or_else(|poison| poison.into_inner()).len()
    }

    /// Whether the queue currently holds no letters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain and return every retained letter, oldest first.
    pub fn drain(&self) -> Vec<DeadLetter> {
        std::mem::take(&mut *self.letters.lock().unwrap_or_else(|poison| poison.into_inner()))
    }
}

impl Default for DeadLetterQueue {
    fn default() -> Self {
        Self::new(1024)
    }
}
