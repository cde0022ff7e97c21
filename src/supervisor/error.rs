//! Error types for supervisor operations.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::activator::ActorError;
use crate::util::ChildId;

/// Errors produced by the supervisor framework.
#[derive(Debug, Error, Clone)]
pub enum SupervisorError {
    /// Child with the specified ID was not registered under this parent.
    #[error("no such child: {id}")]
    ChildNotFound { id: ChildId },

    /// The child's `on_activate` hook failed during a restart.
    #[error("failed to restart child '{id}': {source}")]
    ChildStartFailed { id: ChildId, source: ActorError },

    /// The child's `on_deactivate` hook failed during a stop.
    #[error("failed to stop child '{id}': {source}")]
    ChildStopFailed { id: ChildId, source: ActorError },

    /// The child restarted too many times within the configured window and
    /// the directive was forced to `Stop` (§4.8).
    #[error("restart limit exceeded for child '{id}': {max_restarts} restarts in {window:?}")]
    RestartLimitExceeded {
        id: ChildId,
        max_restarts: u32,
        window: Duration,
    },

    /// Shutdown did not complete within the child's `shutdown_timeout`.
    #[error("child '{id}' shutdown timeout after {timeout:?}")]
    ShutdownTimeout { id: ChildId, timeout: Duration },
}

impl SupervisorError {
    /// Returns `true` if this error should cause escalation rather than a
    /// local retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SupervisorError::RestartLimitExceeded { .. })
    }

    /// Returns `true` if retrying the same operation might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SupervisorError::ChildStartFailed { .. }
                | SupervisorError::ChildStopFailed { .. }
                | SupervisorError::ShutdownTimeout { .. }
        )
    }

    /// The child this error concerns, if any.
    pub fn child_id(&self) -> Option<&ChildId> {
        match self {
            SupervisorError::ChildNotFound { id }
            | SupervisorError::ChildStartFailed { id, .. }
            | SupervisorError::ChildStopFailed { id, .. }
            | SupervisorError::RestartLimitExceeded { id, .. }
            | SupervisorError::ShutdownTimeout { id, .. } => Some(id),
        }
    }
}
