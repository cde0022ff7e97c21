//! Silo configuration and process-level lifecycle (§6, §10.3).
//!
//! [`Silo`] is the entry point: it owns the membership record, the hash
//! ring, the actor directory, the activation table, and the envelope
//! router for one node in the cluster.

pub mod config;
pub mod errors;
pub mod silo;

// Re-exports
pub use config::{
    AdaptiveMailboxConfig, CircuitBreakerConfig, OverflowPolicy, RateLimitConfig, SiloConfig,
    SiloConfigBuilder, DEFAULT_ACTIVATION_LOCK_STRIPES, DEFAULT_DEAD_LETTER_CAPACITY,
    DEFAULT_ENABLE_METRICS, DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_HEARTBEAT_TIMEOUT,
    DEFAULT_IDLE_TIMEOUT, DEFAULT_MAILBOX_CAPACITY, DEFAULT_MAX_ACTORS,
    DEFAULT_ROUTER_RETRIES, DEFAULT_ROUTER_RETRY_BACKOFF, DEFAULT_SHUTDOWN_TIMEOUT,
    DEFAULT_VIRTUAL_NODES_PER_SILO,
};
pub use errors::SiloError;
pub use silo::Silo;
