//! A single running activation: the boxed actor instance plus its lifecycle
//! and supervision bookkeeping (§3, §4.5, §4.8).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::context::ActivationContext;
use super::lifecycle::{ActivationLifecycle, ActivationStatus};
use super::traits::Actor;
use crate::util::{ActorKey, ChildId, SiloId};

/// One activated actor instance and everything the activator needs to
/// manage its lifecycle: the boxed actor (dynamic dispatch, see
/// [`super::traits::Actor`]), its state-store version for optimistic
/// concurrency, and its place in the supervision tree.
pub struct Activation {
    key: ActorKey,
    actor: Box<dyn Actor>,
    lifecycle: ActivationLifecycle,
    /// Version last observed from the state store (§5); `0` before any load.
    version: u64,
    parent: Option<ActorKey>,
    children: Vec<ChildId>,
}

impl Activation {
    /// Wrap a freshly constructed actor instance in the `Created` state.
    pub fn new(key: ActorKey, actor: Box<dyn Actor>) -> Self {
        Self {
            key,
            actor,
            lifecycle: ActivationLifecycle::new(),
            version: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// This activation's key.
    pub fn key(&self) -> &ActorKey {
        &self.key
    }

    /// Mutable access to the boxed actor, for dispatching a turn.
    pub fn actor_mut(&mut self) -> &mut dyn Actor {
        self.actor.as_mut()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ActivationStatus {
        self.lifecycle.status()
    }

    /// Move the lifecycle to a new status.
    pub fn transition_to(&mut self, status: ActivationStatus) {
        self.lifecycle.transition_to(status);
    }

    /// Record a mailbox turn, resetting the idle clock.
    pub fn touch(&mut self) {
        self.lifecycle.touch();
    }

    /// Whether the idle GC sweep should reclaim this activation (§4.5).
    pub fn is_idle(&self, idle_timeout: std::time::Duration) -> bool {
        self.status() == ActivationStatus::Running && self.lifecycle.is_idle(idle_timeout)
    }

    /// State-store version last observed.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record the version observed from a load or a successful save.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// This activation's parent in the supervision tree, if any.
    pub fn parent(&self) -> Option<&ActorKey> {
        self.parent.as_ref()
    }

    /// Record this activation's parent.
    pub fn set_parent(&mut self, parent: ActorKey) {
        self.parent = Some(parent);
    }

    /// Children currently supervised by this activation.
    pub fn children(&self) -> &[ChildId] {
        &self.children
    }

    /// Register `child` as supervised by this activation.
    pub fn add_child(&mut self, child: ChildId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Remove `child` from this activation's supervised set (§4.8 Stop).
    pub fn remove_child(&mut self, child: &ChildId) {
        self.children.retain(|existing| existing != child);
    }

    /// Build a fresh context for a turn against this activation, running on `silo_id`.
    pub fn context(&self, silo_id: SiloId) -> ActivationContext {
        ActivationContext::new(self.key.clone(), silo_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::{ActivationContext as Ctx, ActorError};
    use crate::util::TypeId;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Actor for Noop {
        async fn handle_call(
            &mut self,
            _method: &str,
            payload: Vec<u8>,
            _ctx: &Ctx,
        ) -> Result<Vec<u8>, ActorError> {
            Ok(payload)
        }
    }

    fn key(id: &str) -> ActorKey {
        ActorKey::new(TypeId::new("Noop"), id)
    }

    #[test]
    fn new_activation_starts_created() {
        let activation = Activation::new(key("a1"), Box::new(Noop));
        assert_eq!(activation.status(), ActivationStatus::Created);
        assert_eq!(activation.version(), 0);
    }

    #[test]
    fn children_are_added_and_removed() {
        let mut activation = Activation::new(key("a1"), Box::new(Noop));
        let child = ChildId::new(key("child-1"));
        activation.add_child(child.clone());
        assert_eq!(activation.children(), &[child.clone()]);

        activation.remove_child(&child);
        assert!(activation.children().is_empty());
    }

    #[test]
    fn is_idle_requires_running_status() {
        let mut activation = Activation::new(key("a1"), Box::new(Noop));
        assert!(!activation.is_idle(std::time::Duration::from_secs(0)));

        activation.transition_to(ActivationStatus::Running);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(activation.is_idle(std::time::Duration::from_millis(1)));
    }
}
