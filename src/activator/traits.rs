//! The `Actor` trait implemented by user activation handlers (§4.5, §9).
//!
//! Unlike most of this crate, dispatch onto `Actor` is deliberately
//! dynamic: §9 calls for "dynamic dispatch by method name" and a type
//! registry whose `construct(actor_id) -> Activation` returns an opaque
//! handle, because many unrelated actor types coexist on one silo and are
//! selected at runtime by a string `type_id`. `Box<dyn Actor>` is the
//! correct tool at this one seam even though the rest of the runtime
//! favors generics over trait objects.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::context::ActivationContext;
use crate::util::ChildId;

/// Error returned from any `Actor` hook.
///
/// Handlers return a plain message; the activator wraps it into the
/// appropriate [`crate::message::EnvelopeError`] variant (`ActivationFailure`
/// for constructor/`on_activate` failures, `HandlerFault` for `handle_call`).
#[derive(Debug, Clone)]
pub struct ActorError(pub String);

impl fmt::Display for ActorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ActorError {}

impl From<String> for ActorError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ActorError {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Directive a parent returns from [`Actor::on_child_failure`] (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Ignore the failure; the child continues as if nothing happened.
    Resume,
    /// Deactivate and re-activate the child fresh.
    Restart,
    /// Deactivate the child and remove it from the parent's children.
    Stop,
    /// Treat this as a failure of the parent itself, propagating upward.
    Escalate,
}

impl Default for ErrorAction {
    fn default() -> Self {
        Self::Stop
    }
}

/// A virtual actor's behavior: activation/deactivation hooks, the call
/// dispatcher, and the supervision callback for children (§4.5, §4.8).
///
/// # Example
/// ```rust
/// use silo_rt::activator::{Actor, ActivationContext, ActorError};
/// use async_trait::async_trait;
///
/// struct Counter { value: i64 }
///
/// #[async_trait]
/// impl Actor for Counter {
///     async fn handle_call(
///         &mut self,
///         method: &str,
///         payload: Vec<u8>,
///         _ctx: &ActivationContext,
///     ) -> Result<Vec<u8>, ActorError> {
///         match method {
///             "inc" => {
///                 let delta = i64::from_le_bytes(payload.try_into().unwrap_or([0; 8]));
///                 self.value += delta;
///                 Ok(self.value.to_le_bytes().to_vec())
///             }
///             other => Err(ActorError::from(format!("unknown method {other}"))),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    /// Called once after construction, before the first mailbox turn runs.
    /// Default: no-op success.
    async fn on_activate(&mut self, _ctx: &ActivationContext) -> Result<(), ActorError> {
        Ok(())
    }

    /// Called once while deactivating, after the mailbox has drained.
    /// Must be idempotent (§4.5); default: no-op success.
    async fn on_deactivate(&mut self, _ctx: &ActivationContext) -> Result<(), ActorError> {
        Ok(())
    }

    /// Handle one mailbox turn: `method` dispatch with an opaque `payload`,
    /// returning the opaque response payload.
    async fn handle_call(
        &mut self,
        method: &str,
        payload: Vec<u8>,
        ctx: &ActivationContext,
    ) -> Result<Vec<u8>, ActorError>;

    /// Supervision callback invoked when `child` failed unrecoverably.
    /// Default: stop the child.
    async fn on_child_failure(&mut self, _child: ChildId, _reason: String) -> ErrorAction {
        ErrorAction::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{ActorKey, SiloId, TypeId};

    struct Echo;

    #[async_trait]
    impl Actor for Echo {
        async fn handle_call(
            &mut self,
            method: &str,
            payload: Vec<u8>,
            _ctx: &ActivationContext,
        ) -> Result<Vec<u8>, ActorError> {
            match method {
                "echo" => Ok(payload),
                other => Err(ActorError::from(format!("unknown method {other}"))),
            }
        }
    }

    fn ctx() -> ActivationContext {
        ActivationContext::new(
            ActorKey::new(TypeId::new("Echo"), "e1"),
            SiloId::new("silo-A"),
        )
    }

    #[tokio::test]
    async fn default_hooks_succeed() {
        let mut actor = Echo;
        assert!(actor.on_activate(&ctx()).await.is_ok());
        assert!(actor.on_deactivate(&ctx()).await.is_ok());
    }

    #[tokio::test]
    async fn handle_call_dispatches_by_method_name() {
        let mut actor = Echo;
        let response = actor.handle_call("echo", vec![1, 2, 3], &ctx()).await;
        assert_eq!(response.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn unknown_method_is_an_error() {
        let mut actor = Echo;
        let response = actor.handle_call("bogus", vec![], &ctx()).await;
        assert!(response.is_err());
    }

    #[tokio::test]
    async fn default_on_child_failure_stops() {
        let mut actor = Echo;
        let key = ActorKey::new(TypeId::new("Echo"), "child-1");
        let action = actor
            .on_child_failure(ChildId::new(key), "boom".to_string())
            .await;
        assert_eq!(action, ErrorAction::Stop);
    }

    #[test]
    fn error_action_default_is_stop() {
        assert_eq!(ErrorAction::default(), ErrorAction::Stop);
    }
}
