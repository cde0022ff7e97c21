//! Cluster membership: the live silo set and its join/leave event stream (§4.1).
//!
//! [`MembershipRegistry`] is the single source of truth for "which silos are
//! currently alive." Each silo refreshes its own record on a timer; a
//! [`health`] monitor, co-owned by every silo but acting only on peers,
//! evicts records that go stale.

pub mod error;
pub mod health;
pub mod registry;
pub mod types;

pub use error::MembershipError;
pub use health::HealthMonitor;
pub use registry::MembershipRegistry;
pub use types::{EvictionPolicy, MembershipEvent, SiloRecord, SiloStatus};
