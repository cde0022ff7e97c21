//! Monitoring event types and configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::util::{ActorKey, ChildId, SiloId};

/// Configuration for monitoring behavior.
///
/// Controls how events are recorded, filtered, and stored in the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    /// Whether monitoring is enabled
    pub enabled: bool,

    /// Maximum number of events to keep in history
    pub max_history_size: usize,

    /// Minimum severity level to record (events below this are filtered)
    pub severity_filter: EventSeverity,

    /// Interval for snapshot generation (if using background snapshots)
    #[serde(with = "crate::util::duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Snapshot of monitoring state at a point in time.
///
/// Provides queryable access to monitoring counters and recent event history.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    /// Timestamp when snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded
    pub total_events: u64,

    /// Number of trace-level events
    pub trace_count: u64,

    /// Number of debug-level events
    pub debug_count: u64,

    /// Number of info-level events
    pub info_count: u64,

    /// Number of warning-level events
    pub warning_count: u64,

    /// Number of error-level events
    pub error_count: u64,

    /// Number of critical-level events
    pub critical_count: u64,

    /// Recent events (up to max_history_size)
    pub recent_events: Vec<E>,
}

// ============================================================================
// Supervision Events
// ============================================================================

/// Events related to supervisor operations and child management (§4.8).
#[derive(Debug, Clone, Serialize)]
pub struct SupervisionEvent {
    /// Timestamp when event occurred (§3.2 chrono DateTime<Utc>)
    pub timestamp: DateTime<Utc>,

    /// ID of the supervisor
    pub supervisor_id: String,

    /// ID of the affected child, if applicable
    pub child_id: Option<ChildId>,

    /// Specific supervision event type
    pub event_kind: SupervisionEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SupervisionEvent {
    const EVENT_TYPE: &'static str = "supervision";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SupervisionEventKind::ChildStarted => EventSeverity::Info,
            SupervisionEventKind::ChildStopped => EventSeverity::Info,
            SupervisionEventKind::ChildFailed { .. } => EventSeverity::Error,
            SupervisionEventKind::ChildRestarted { .. } => EventSeverity::Warning,
            SupervisionEventKind::RestartLimitExceeded { .. } => EventSeverity::Critical,
            SupervisionEventKind::StrategyApplied { .. } => EventSeverity::Info,
        }
    }
}

/// Specific types of supervision events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SupervisionEventKind {
    /// Child activation successfully started
    ChildStarted,

    /// Child activation gracefully stopped
    ChildStopped,

    /// Child activation failed with error (§7 `HandlerFault`)
    ChildFailed {
        /// Error message
        error: String,
        /// Current restart count
        restart_count: u32,
    },

    /// Child activation was restarted after failure
    ChildRestarted {
        /// Restart count after this restart
        restart_count: u32,
    },

    /// Restart rate limit exceeded; directive escalated to the parent
    RestartLimitExceeded {
        /// Number of restarts attempted
        restart_count: u32,
        /// Time window for restart limit
        #[serde(with = "crate::util::duration_serde")]
        window: Duration,
    },

    /// Supervision strategy was applied
    StrategyApplied {
        /// Name of the strategy (OneForOne, OneForAll, RestForOne)
        strategy: String,
        /// Number of children affected
        affected_count: usize,
    },
}

// ============================================================================
// Activation Events
// ============================================================================

/// Events related to virtual-actor activation lifecycle (§4.5).
#[derive(Debug, Clone, Serialize)]
pub struct ActivationEvent {
    /// Timestamp when event occurred (§3.2 chrono DateTime<Utc>)
    pub timestamp: DateTime<Utc>,

    /// Key of the affected actor
    pub actor_key: ActorKey,

    /// Specific activation event type
    pub event_kind: ActivationEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for ActivationEvent {
    const EVENT_TYPE: &'static str = "activation";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            ActivationEventKind::Activated => EventSeverity::Debug,
            ActivationEventKind::TurnStarted { .. } => EventSeverity::Trace,
            ActivationEventKind::TurnCompleted { .. } => EventSeverity::Trace,
            ActivationEventKind::ActivationFailed { .. } => EventSeverity::Error,
            ActivationEventKind::Deactivated => EventSeverity::Info,
            ActivationEventKind::IdleReclaimed => EventSeverity::Debug,
        }
    }
}

/// Specific types of activation events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ActivationEventKind {
    /// Actor was lazily activated
    Activated,

    /// A turn began dispatching against this activation
    TurnStarted {
        /// Method name being dispatched
        method: String,
    },

    /// A turn finished dispatching
    TurnCompleted {
        /// Method name that was dispatched
        method: String,
        /// Processing duration in microseconds
        duration_micros: u64,
    },

    /// The constructor or `on_activate` hook failed
    ActivationFailed {
        /// Error message
        error: String,
    },

    /// Actor was explicitly deactivated
    Deactivated,

    /// Actor was reclaimed by the idle GC sweep
    IdleReclaimed,
}

// ============================================================================
// System Events
// ============================================================================

/// Events related to silo lifecycle and cluster membership (§4.1, §4.9).
#[derive(Debug, Clone, Serialize)]
pub struct SystemEvent {
    /// Timestamp when event occurred (§3.2 chrono DateTime<Utc>)
    pub timestamp: DateTime<Utc>,

    /// Specific system event type
    pub event_kind: SystemEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SystemEvent {
    const EVENT_TYPE: &'static str = "system";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SystemEventKind::Started => EventSeverity::Info,
            SystemEventKind::Draining => EventSeverity::Info,
            SystemEventKind::Stopped => EventSeverity::Info,
            SystemEventKind::SiloJoined { .. } => EventSeverity::Info,
            SystemEventKind::SiloLeft { .. } => EventSeverity::Warning,
            SystemEventKind::SiloEvicted { .. } => EventSeverity::Critical,
        }
    }
}

/// Specific types of system events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SystemEventKind {
    /// Silo started and joined the cluster
    Started,

    /// Silo entered graceful drain before stopping
    Draining,

    /// Silo fully stopped
    Stopped,

    /// A peer silo joined the cluster
    SiloJoined {
        /// ID of the joining silo
        silo_id: SiloId,
    },

    /// A peer silo left the cluster gracefully
    SiloLeft {
        /// ID of the departing silo
        silo_id: SiloId,
    },

    /// A peer silo was evicted by the health monitor
    SiloEvicted {
        /// ID of the evicted silo
        silo_id: SiloId,
    },
}

// ============================================================================
// Router Events
// ============================================================================

/// Events related to envelope routing (§4.6).
#[derive(Debug, Clone, Serialize)]
pub struct RouterEvent {
    /// Timestamp when event occurred (§3.2 chrono DateTime<Utc>)
    pub timestamp: DateTime<Utc>,

    /// Specific router event type
    pub event_kind: RouterEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for RouterEvent {
    const EVENT_TYPE: &'static str = "router";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            RouterEventKind::RoutedLocally { .. } => EventSeverity::Trace,
            RouterEventKind::RoutedRemotely { .. } => EventSeverity::Trace,
            RouterEventKind::RoutingFailed { .. } => EventSeverity::Error,
            RouterEventKind::DeadLettered { .. } => EventSeverity::Warning,
        }
    }
}

/// Specific types of router events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum RouterEventKind {
    /// Envelope dispatched through the local fast path
    RoutedLocally {
        /// Target actor key's routing key
        target: String,
    },

    /// Envelope shipped to a remote silo
    RoutedRemotely {
        /// Target actor key's routing key
        target: String,
        /// Owning silo
        silo_id: SiloId,
    },

    /// Routing failed after retries were exhausted
    RoutingFailed {
        /// Target actor key's routing key
        target: String,
        /// Failure reason
        reason: String,
    },

    /// Envelope was recorded in the dead-letter queue
    DeadLettered {
        /// Target actor key's routing key
        target: String,
        /// Reason for dead lettering
        reason: String,
    },
}
