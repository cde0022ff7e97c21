//! Type definitions for the supervisor framework (§4.8).

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::util::ChildId;

/// How a supervised child should be restarted once it fails, independent of
/// the group-level [`super::traits::SupervisionStrategy`] (§4.8).
///
/// # Examples
///
/// ```rust
/// use silo_rt::supervisor::RestartPolicy;
///
/// assert!(RestartPolicy::Permanent.should_restart(true));
/// assert!(RestartPolicy::Permanent.should_restart(false));
///
/// assert!(RestartPolicy::Transient.should_restart(true));
/// assert!(!RestartPolicy::Transient.should_restart(false));
///
/// assert!(!RestartPolicy::Temporary.should_restart(true));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Always restart, regardless of exit reason.
    Permanent,
    /// Restart only if the child exited abnormally.
    Transient,
    /// Never restart.
    Temporary,
}

impl RestartPolicy {
    /// Returns `true` if this policy should restart on the given exit condition.
    pub fn should_restart(&self, is_error: bool) -> bool {
        match self {
            RestartPolicy::Permanent => true,
            RestartPolicy::Transient => is_error,
            RestartPolicy::Temporary => false,
        }
    }
}

/// How a supervised child should be stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Wait for graceful deactivation within the timeout, then force it.
    Graceful(Duration),
    /// Force deactivation immediately.
    Immediate,
    /// Wait indefinitely for graceful deactivation.
    Infinity,
}

impl ShutdownPolicy {
    /// Returns the timeout for this policy, if any.
    pub fn timeout(&self) -> Option<Duration> {
        match self {
            ShutdownPolicy::Graceful(duration) => Some(*duration),
            ShutdownPolicy::Immediate => Some(Duration::ZERO),
            ShutdownPolicy::Infinity => None,
        }
    }

    /// Returns `true` unless this is immediate termination.
    pub fn is_graceful(&self) -> bool {
        !matches!(self, ShutdownPolicy::Immediate)
    }
}

/// Lifecycle state of a supervised child, as tracked by the [`super::tree::SupervisorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildState {
    Starting,
    Running,
    Stopping,
    Stopped,
    Restarting,
    Failed,
}

impl ChildState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChildState::Stopped | ChildState::Failed)
    }

    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            ChildState::Starting | ChildState::Stopping | ChildState::Restarting
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ChildState::Running)
    }
}

/// Health status reported by a supervised child's actor, if it chooses to
/// report one beyond the implicit healthy/failed distinction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildHealth {
    Healthy,
    Degraded(String),
    Failed(String),
}

impl ChildHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ChildHealth::Healthy)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ChildHealth::Degraded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChildHealth::Failed(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ChildHealth::Healthy => None,
            ChildHealth::Degraded(reason) | ChildHealth::Failed(reason) => Some(reason),
        }
    }
}

/// Specification for a child registered under a parent activation (§4.8).
#[derive(Debug, Clone)]
pub struct ChildSpec {
    /// The child's identity within the parent's supervision tree.
    pub id: ChildId,
    pub restart_policy: RestartPolicy,
    pub shutdown_policy: ShutdownPolicy,
    pub start_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl ChildSpec {
    /// A permanent child with graceful 5s shutdown and 10s start/stop budgets.
    pub fn new(id: ChildId) -> Self {
        Self {
            id,
            restart_policy: RestartPolicy::Permanent,
            shutdown_policy: ShutdownPolicy::Graceful(Duration::from_secs(5)),
            start_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }

    pub fn with_shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }
}

/// Context passed to [`super::traits::SupervisionStrategy::determine_decision`].
#[derive(Debug, Clone)]
pub enum StrategyContext {
    /// One child of the group failed.
    SingleFailure {
        failed_child_id: ChildId,
        /// All children of the group, in registration order.
        all_child_ids: Vec<ChildId>,
    },
    /// A caller asked to restart one child directly (not a failure).
    ManualRestart { child_id: ChildId },
    /// The whole group is being torn down.
    Shutdown { all_child_ids: Vec<ChildId> },
}

/// Decision produced by a [`super::traits::SupervisionStrategy`] for a failure,
/// mapping directly onto the directive vocabulary of §4.8
/// (`Resume`/`Restart`/`Stop`/`Escalate` map to `RestartChild`/`RestartAll`/
/// `RestartSubset`/`StopChild`/`StopAll`/`Escalate`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisionDecision {
    /// Restart only the specified child.
    RestartChild(ChildId),
    /// Restart every child in the group.
    RestartAll(Vec<ChildId>),
    /// Restart a subset of the group (used by `RestForOne`).
    RestartSubset(Vec<ChildId>),
    /// Stop the specified child without restarting it.
    StopChild(ChildId),
    /// Stop every child in the group without restarting.
    StopAll,
    /// Propagate the failure to the parent's own supervisor.
    Escalate(String),
}
