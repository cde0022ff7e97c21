//! Integration tests for supervisor tree hierarchies.
//!
//! Exercises multi-parent groups, monitored failure escalation, and
//! restart-rate limiting across a realistic child topology.

#![allow(clippy::unwrap_used)]

use silo_rt::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, SupervisionEvent};
use silo_rt::supervisor::{
    ChildSpec, OneForAll, OneForOne, RestForOne, ShutdownPolicy, Supervisor, SupervisionDecision,
    SupervisorError, SupervisorTree,
};
use silo_rt::util::{ActorKey, ChildId, TypeId};

fn manager(n: &str) -> ActorKey {
    ActorKey::new(TypeId::new("Manager"), n)
}

fn worker(n: &str) -> ChildId {
    ChildId::new(ActorKey::new(TypeId::new("Worker"), n))
}

#[tokio::test]
async fn independent_parents_fail_without_affecting_each_other() {
    let tree = SupervisorTree::<OneForOne>::new("cluster-root");

    tree.register_child(manager("team-a"), ChildSpec::new(worker("a1")))
        .await;
    tree.register_child(manager("team-a"), ChildSpec::new(worker("a2")))
        .await;
    tree.register_child(manager("team-b"), ChildSpec::new(worker("b1")))
        .await;

    let decision = tree
        .handle_child_failure(&manager("team-a"), worker("a1"), "connection reset".into())
        .await
        .unwrap();
    assert_eq!(decision, SupervisionDecision::RestartChild(worker("a1")));

    // team-b's child is untouched by team-a's failure.
    let result = tree
        .handle_child_failure(&manager("team-b"), worker("b1"), "oom".into())
        .await
        .unwrap();
    assert_eq!(result, SupervisionDecision::RestartChild(worker("b1")));
}

#[tokio::test]
async fn one_for_all_group_restarts_siblings_registered_under_the_same_parent() {
    let tree = SupervisorTree::<OneForAll>::new("cluster-root");
    let parent = manager("pool");

    for n in ["w1", "w2", "w3"] {
        tree.register_child(parent.clone(), ChildSpec::new(worker(n)))
            .await;
    }

    let decision = tree
        .handle_child_failure(&parent, worker("w2"), "panic".into())
        .await
        .unwrap();

    assert_eq!(
        decision,
        SupervisionDecision::RestartAll(vec![worker("w1"), worker("w2"), worker("w3")])
    );
}

#[tokio::test]
async fn rest_for_one_restarts_only_children_started_after_the_failure() {
    let tree = SupervisorTree::<RestForOne>::new("cluster-root");
    let parent = manager("pipeline");

    for n in ["stage-1", "stage-2", "stage-3", "stage-4"] {
        tree.register_child(parent.clone(), ChildSpec::new(worker(n)))
            .await;
    }

    let decision = tree
        .handle_child_failure(&parent, worker("stage-2"), "upstream closed".into())
        .await
        .unwrap();

    assert_eq!(
        decision,
        SupervisionDecision::RestartSubset(vec![worker("stage-2"), worker("stage-3"), worker("stage-4")])
    );
}

#[tokio::test]
async fn monitored_tree_records_escalation_up_to_the_forced_stop() {
    let monitor = InMemoryMonitor::<SupervisionEvent>::new(MonitoringConfig::default());
    let tree = SupervisorTree::<OneForOne, _>::with_monitor("cluster-root", monitor.clone());
    let parent = manager("flaky-pool");
    tree.register_child(parent.clone(), ChildSpec::new(worker("flaky")))
        .await;

    let mut last_decision = None;
    for _ in 0..10 {
        last_decision = Some(
            tree.handle_child_failure(&parent, worker("flaky"), "connection refused".into())
                .await
                .unwrap(),
        );
    }

    assert_eq!(last_decision, Some(SupervisionDecision::StopChild(worker("flaky"))));

    let snapshot = monitor.snapshot().await.unwrap();
    assert!(snapshot.critical_count >= 1, "restart limit should escalate to a critical event");
    assert!(snapshot.error_count >= 10, "every failure is recorded as an error event");
}

#[tokio::test]
async fn deregistering_a_child_removes_it_from_future_group_decisions() {
    let tree = SupervisorTree::<OneForAll>::new("cluster-root");
    let parent = manager("pool");

    tree.register_child(parent.clone(), ChildSpec::new(worker("keep")))
        .await;
    tree.register_child(parent.clone(), ChildSpec::new(worker("drop")))
        .await;
    tree.deregister_child(&parent, &worker("drop")).await;

    let decision = tree
        .handle_child_failure(&parent, worker("keep"), "boom".into())
        .await
        .unwrap();
    assert_eq!(decision, SupervisionDecision::RestartAll(vec![worker("keep")]));
}

#[tokio::test]
async fn failure_reported_for_a_child_under_the_wrong_parent_is_not_found() {
    let tree = SupervisorTree::<OneForOne>::new("cluster-root");
    tree.register_child(manager("team-a"), ChildSpec::new(worker("a1")))
        .await;

    let result = tree
        .handle_child_failure(&manager("team-b"), worker("a1"), "boom".into())
        .await;
    assert!(matches!(result, Err(SupervisorError::ChildNotFound { .. })));
}

#[tokio::test]
async fn child_spec_shutdown_policy_survives_registration() {
    let tree = SupervisorTree::<OneForOne>::new("cluster-root");
    let parent = manager("pool");
    let spec = ChildSpec::new(worker("patient")).with_shutdown_policy(ShutdownPolicy::Immediate);

    tree.register_child(parent.clone(), spec).await;

    // Registration is idempotent on id: re-registering replaces the spec,
    // not the group ordering.
    let replacement =
        ChildSpec::new(worker("patient")).with_shutdown_policy(ShutdownPolicy::Immediate);
    tree.register_child(parent, replacement).await;
}
