//! Activation state machine and idle-tracking.
//!
//! §3/§4.5: `Created -> Activating -> Running -> Deactivating`, with a
//! `Faulted` absorbing state entered when the constructor or `on_activate`
//! hook fails.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
// (none)

/// Lifecycle state of an [`crate::activator::activation::Activation`] (§3).
///
/// # State Transitions
///
/// ```text
/// Created -> Activating -> Running -> Deactivating -> (removed)
///                 |
///                 v
///             Faulted -> (removed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    /// Entry exists in the activation map but the activation pipeline has not started.
    Created,

    /// Constructing the actor and running `on_activate` (state load, user hook).
    Activating,

    /// Accepting mailbox turns.
    Running,

    /// Draining the mailbox and persisting final state before removal.
    Deactivating,

    /// Constructor or `on_activate` failed; awaiting removal.
    Faulted,
}

impl Default for ActivationStatus {
    fn default() -> Self {
        Self::Created
    }
}

impl ActivationStatus {
    /// `true` for `Deactivating` and `Faulted`: no further turns will be accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActivationStatus::Deactivating | ActivationStatus::Faulted)
    }

    /// `true` only in `Running`, i.e. eligible to accept a new mailbox turn.
    pub fn accepts_turns(&self) -> bool {
        matches!(self, ActivationStatus::Running)
    }
}

/// Tracks an activation's current status and idle time for the GC sweep
/// (§4.5 "Idle GC").
#[derive(Debug, Clone)]
pub struct ActivationLifecycle {
    status: ActivationStatus,
    last_state_change: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl ActivationLifecycle {
    /// Create a tracker in the `Created` state, freshly touched.
    pub fn new() -> Self {
        let now = Utc::now(); // §3.2
        Self {
            status: ActivationStatus::Created,
            last_state_change: now,
            last_active: now,
        }
    }

    /// Move to a new status, stamping the transition time.
    pub fn transition_to(&mut self, status: ActivationStatus) {
        self.status = status;
        self.last_state_change = Utc::now();
    }

    /// Record a mailbox turn, resetting the idle clock.
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Current status.
    pub fn status(&self) -> ActivationStatus {
        self.status
    }

    /// Timestamp of the last status transition.
    pub fn last_state_change(&self) -> DateTime<Utc> {
        self.last_state_change
    }

    /// Timestamp of the last mailbox turn.
    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Whether this activation has been idle longer than `idle_timeout`.
    pub fn is_idle(&self, idle_timeout: std::time::Duration) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.last_active);
        elapsed
            .to_std()
            .map(|elapsed| elapsed > idle_timeout)
            .unwrap_or(false)
    }
}

impl Default for ActivationLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
