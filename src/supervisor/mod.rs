//! Supervision tree for virtual-actor parent/child fault recovery (§4.8).
//!
//! Each activation may register children under itself; when a child fails
//! unrecoverably the parent's [`crate::activator::Actor::on_child_failure`]
//! hook returns a directive (`Resume`/`Restart`/`Stop`/`Escalate`). A
//! [`SupervisorTree`] sits above that per-actor hook: it applies a
//! group-level [`SupervisionStrategy`] (`OneForOne`, `OneForAll`,
//! `RestForOne`) to decide which siblings are also affected, and enforces
//! exponential-backoff restart-rate limiting via [`RestartBackoff`] so a
//! persistently failing child is eventually forced to `Stop` rather than
//! restarted forever.
//!
//! # Example
//! ```
//! use silo_rt::supervisor::{SupervisorTree, Supervisor, OneForOne, ChildSpec, SupervisionDecision};
//! use silo_rt::util::{ActorKey, ChildId, TypeId};
//!
//! # async fn example() {
//! let tree = SupervisorTree::<OneForOne>::new("root");
//! let parent = ActorKey::new(TypeId::new("Manager"), "m1");
//! let child = ChildId::new(ActorKey::new(TypeId::new("Worker"), "w1"));
//!
//! tree.register_child(parent.clone(), ChildSpec::new(child.clone())).await;
//! let decision = tree
//!     .handle_child_failure(&parent, child.clone(), "connection lost".into())
//!     .await
//!     .unwrap();
//! assert_eq!(decision, SupervisionDecision::RestartChild(child));
//! # }
//! ```

pub mod backoff;
pub mod error;
pub mod strategy;
pub mod traits;
pub mod tree;
pub mod types;

pub use backoff::RestartBackoff;
pub use error::SupervisorError;
pub use strategy::{OneForAll, OneForOne, RestForOne};
pub use traits::{Supervisor, SupervisionStrategy};
pub use tree::SupervisorTree;
pub use types::{
    ChildHealth, ChildSpec, ChildState, RestartPolicy, ShutdownPolicy, StrategyContext,
    SupervisionDecision,
};
