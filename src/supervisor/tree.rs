//! [`SupervisorTree`]: the concrete [`Supervisor`] implementation (§4.8).

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Mutex;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use dashmap::DashMap;

// Layer 3: Internal module imports
use super::backoff::RestartBackoff;
use super::error::SupervisorError;
use super::traits::{Supervisor, SupervisionStrategy};
use super::types::{ChildSpec, StrategyContext, SupervisionDecision};
use crate::monitoring::{Monitor, NoopMonitor, SupervisionEvent, SupervisionEventKind};
use crate::util::{ActorKey, ChildId};

/// Per-parent bookkeeping: the ordered child list needed by `RestForOne`,
/// each child's spec, and a shared restart-rate tracker for the group.
struct Group {
    order: Vec<ChildId>,
    specs: HashMap<ChildId, ChildSpec>,
    backoff: Mutex<RestartBackoff>,
}

impl Group {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            specs: HashMap::new(),
            backoff: Mutex::new(RestartBackoff::default()),
        }
    }
}

/// Tracks the children registered under each parent activation and applies
/// a [`SupervisionStrategy`] plus restart-rate limiting when one fails.
///
/// `S` selects the group restart strategy (`OneForOne`, `OneForAll`,
/// `RestForOne`); `M` is the monitor that observes supervision events,
/// defaulting to [`NoopMonitor`] for zero overhead when unused.
pub struct SupervisorTree<S: SupervisionStrategy, M: Monitor<SupervisionEvent> = NoopMonitor<SupervisionEvent>> {
    id: String,
    groups: DashMap<ActorKey, Group>,
    monitor: M,
    _strategy: PhantomData<S>,
}

impl<S: SupervisionStrategy> SupervisorTree<S, NoopMonitor<SupervisionEvent>> {
    /// Create a tree identified by `id` with no monitoring.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_monitor(id, NoopMonitor::new())
    }
}

impl<S: SupervisionStrategy, M: Monitor<SupervisionEvent>> SupervisorTree<S, M> {
    /// Create a tree identified by `id`, recording supervision events to `monitor`.
    pub fn with_monitor(id: impl Into<String>, monitor: M) -> Self {
        Self {
            id: id.into(),
            groups: DashMap::new(),
            monitor,
            _strategy: PhantomData,
        }
    }

    async fn record(&self, child_id: Option<ChildId>, kind: SupervisionEventKind) {
        let _ = self
            .monitor
            .record(SupervisionEvent {
                timestamp: chrono::Utc::now(),
                supervisor_id: self.id.clone(),
                child_id,
                event_kind: kind,
                metadata: HashMap::new(),
            })
            .await;
    }
}

#[async_trait]
impl<S: SupervisionStrategy, M: Monitor<SupervisionEvent>> Supervisor for SupervisorTree<S, M> {
    async fn register_child(&self, parent: ActorKey, spec: ChildSpec) {
        let mut group = self.groups.entry(parent).or_insert_with(Group::new);
        if !group.specs.contains_key(&spec.id) {
            group.order.push(spec.id.clone());
        }
        group.specs.insert(spec.id.clone(), spec);
    }

    async fn deregister_child(&self, parent: &ActorKey, child: &ChildId) {
        if let Some(mut group) = self.groups.get_mut(parent) {
            group.order.retain(|id| id != child);
            group.specs.remove(child);
        }
    }

    async fn handle_child_failure(
        &self,
        parent: &ActorKey,
        child: ChildId,
        reason: String,
    ) -> Result<SupervisionDecision, SupervisorError> {
        let Some(group) = self.groups.get(parent) else {
            return Err(SupervisorError::ChildNotFound { id: child });
        };
        if !group.specs.contains_key(&child) {
            return Err(SupervisorError::ChildNotFound { id: child });
        }

        let restart_count = {
            let mut backoff = group.backoff.lock().expect("backoff mutex poisoned");
            backoff.record_restart();
            backoff.restart_count()
        };

        self.record(
            Some(child.clone()),
            SupervisionEventKind::ChildFailed {
                error: reason,
                restart_count,
            },
        )
        .await;

        let limit_exceeded = {
            let mut backoff = group.backoff.lock().expect("backoff mutex poisoned");
            backoff.is_limit_exceeded()
        };

        if limit_exceeded {
            self.record(
                Some(child.clone()),
                SupervisionEventKind::RestartLimitExceeded {
                    restart_count,
                    window: std::time::Duration::from_secs(60),
                },
            )
            .await;
            return Ok(SupervisionDecision::StopChild(child));
        }

        let context = StrategyContext::SingleFailure {
            failed_child_id: child,
            all_child_ids: group.order.clone(),
        };
        let decision = S::determine_decision(context);

        let affected = match &decision {
            SupervisionDecision::RestartChild(_) => 1,
            SupervisionDecision::RestartAll(ids) | SupervisionDecision::RestartSubset(ids) => {
                ids.len()
            }
            _ => 0,
        };
        if affected > 0 {
            self.record(
                None,
                SupervisionEventKind::StrategyApplied {
                    strategy: std::any::type_name::<S>().to_string(),
                    affected_count: affected,
                },
            )
            .await;
        }

        Ok(decision)
    }
}
