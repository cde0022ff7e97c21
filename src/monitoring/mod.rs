//! # Monitoring Module
//!
//! Universal monitoring infrastructure for observing and tracking events across all runtime components.
//!
//! ## Features
//! - **Generic Monitor<E> Trait**: Universal monitoring for any entity type
//! - **Zero-Cost Abstraction**: NoopMonitor compiles away when disabled
//! - **Lock-Free Recording**: Atomic counters for concurrent event tracking
//! - **Type Safety**: MonitoringEvent trait ensures compile-time correctness
//!
//! ## Event Types
//! - `SupervisionEvent`: supervisor tree operations and restart directives (§4.8)
//! - `ActivationEvent`: virtual-actor activation lifecycle and turns (§4.5)
//! - `SystemEvent`: silo lifecycle and cluster membership (§4.1, §4.9)
//! - `RouterEvent`: envelope routing outcomes (§4.6)
//!
//! ## Examples
//! ```
//! use silo_rt::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, SystemEvent, SystemEventKind};
//! use std::collections::HashMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitoringConfig::default();
//! let monitor = InMemoryMonitor::new(config);
//!
//! monitor.record(SystemEvent {
//!     timestamp: chrono::Utc::now(),
//!     event_kind: SystemEventKind::Started,
//!     metadata: HashMap::new(),
//! }).await?;
//!
//! let snapshot = monitor.snapshot().await?;
//! assert_eq!(snapshot.total_events, 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod in_memory;
pub mod noop;
pub mod traits;
pub mod types;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{
    ActivationEvent, ActivationEventKind, MonitoringConfig, MonitoringSnapshot, RouterEvent,
    RouterEventKind, SupervisionEvent, SupervisionEventKind, SystemEvent, SystemEventKind,
};
