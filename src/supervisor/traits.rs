//! Core traits for the supervisor framework (§4.8).

// Layer 1: Standard library imports
// (none needed)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::error::SupervisorError;
use super::types::{ChildSpec, StrategyContext, SupervisionDecision};
use crate::util::{ActorKey, ChildId};

/// Decides which children a group restarts together when one of them fails.
///
/// Implementations are zero-sized marker types; the decision itself is a
/// pure function of the [`StrategyContext`], so strategies never hold state
/// (restart counting and backoff live in [`super::tree::SupervisorTree`]).
pub trait SupervisionStrategy: Send + Sync + 'static {
    /// Determines what action to take based on the supervision context.
    fn determine_decision(context: StrategyContext) -> SupervisionDecision;
}

/// A supervisor that manages the children registered under one parent
/// activation, per §4.8.
#[async_trait]
pub trait Supervisor: Send + Sync + 'static {
    /// Register a new child under `parent`.
    async fn register_child(&self, parent: ActorKey, spec: ChildSpec);

    /// Remove `child` from `parent`'s group without invoking shutdown.
    async fn deregister_child(&self, parent: &ActorKey, child: &ChildId);

    /// Handle an unrecoverable failure of `child`, applying the group's
    /// [`SupervisionStrategy`] and restart-rate limiting, and returning the
    /// resulting decision.
    ///
    /// # Errors
    /// Returns [`SupervisorError::ChildNotFound`] if `child` is not
    /// registered under `parent`.
    async fn handle_child_failure(
        &self,
        parent: &ActorKey,
        child: ChildId,
        reason: String,
    ) -> Result<SupervisionDecision, SupervisorError>;
}
