//! Silo configuration with sensible defaults (§6).

// Layer 1: Standard library
use std::time::Duration;

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
use crate::membership::EvictionPolicy;

/// Default mailbox capacity for bounded mailboxes (§6 `MailboxCapacity`)
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1024;

/// Default timeout for graceful silo shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum concurrent activations (0 = unlimited)
pub const DEFAULT_MAX_ACTORS: usize = 0;

/// Default metrics collection setting
pub const DEFAULT_ENABLE_METRICS: bool = false;

/// Default interval between outgoing heartbeats (§6 `HeartbeatInterval`)
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// Default staleness window before a peer is considered unreachable (§6 `HeartbeatTimeout`)
pub const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default idle period before an activation is swept by GC (§6 `IdleTimeout`)
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Default number of stripes in the activation lock (§6 `ActivationLockStripes`)
pub const DEFAULT_ACTIVATION_LOCK_STRIPES: usize = 256;

/// Default virtual nodes placed per silo on the hash ring (§6 `VirtualNodesPerSilo`)
pub const DEFAULT_VIRTUAL_NODES_PER_SILO: usize = 150;

/// Default number of routing attempts before giving up (§6 `RouterRetries`)
pub const DEFAULT_ROUTER_RETRIES: u32 = 3;

/// Default base delay between routing retries (§6 `RouterRetryBackoff`)
pub const DEFAULT_ROUTER_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Default dead-letter queue capacity
pub const DEFAULT_DEAD_LETTER_CAPACITY: usize = 1000;

/// Default consecutive unhealthy checks before eviction under `HealthScore`/`Hybrid` policies
pub const DEFAULT_CONSECUTIVE_UNHEALTHY_CHECKS: u32 = 3;

/// Default health-score floor before a silo is considered unhealthy
pub const DEFAULT_HEALTH_SCORE_THRESHOLD: f64 = 0.5;

/// Adaptive mailbox capacity tuning (§6 `AdaptiveMailbox`).
///
/// When enabled, a mailbox grows towards `max` after `samples_before_adapt`
/// consecutive samples above `grow_threshold` occupancy, and shrinks towards
/// `min` after the same number of samples below `shrink_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveMailboxConfig {
    pub enabled: bool,
    pub min: usize,
    pub max: usize,
    pub grow_threshold: f64,
    pub shrink_threshold: f64,
    pub samples_before_adapt: u32,
}

impl Default for AdaptiveMailboxConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min: 64,
            max: 8192,
            grow_threshold: 0.8,
            shrink_threshold: 0.2,
            samples_before_adapt: 5,
        }
    }
}

/// Per-activation circuit breaker (§6 `CircuitBreaker`).
///
/// Tracks call outcomes over `sampling_window`; once `failure_threshold`
/// consecutive failures are seen the breaker opens for `open_timeout`
/// before allowing `success_threshold` trial calls through again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    pub enabled: bool,
    pub failure_threshold: u32,
    pub success_threshold: u32,
    pub open_timeout: Duration,
    pub sampling_window: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            failure_threshold: 5,
            success_threshold: 2,
            open_timeout: Duration::from_secs(30),
            sampling_window: Duration::from_secs(60),
        }
    }
}

/// What happens to an envelope that arrives once a rate limit's window is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Silently discard the envelope.
    Drop,
    /// Reject immediately with a rate-limited response.
    Reject,
    /// Queue behind the mailbox's own backpressure strategy.
    Queue,
}

/// Per-activation call rate limiting (§6 `RateLimit`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_per_window: u32,
    pub window: Duration,
    pub overflow: OverflowPolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_per_window: 1000,
            window: Duration::from_secs(1),
            overflow: OverflowPolicy::Reject,
        }
    }
}

/// Silo-wide configuration for the virtual-actor runtime (§6).
///
/// # Examples
///
/// ```rust
/// use silo_rt::SiloConfig;
/// use std::time::Duration;
///
/// let config = SiloConfig::default();
/// assert_eq!(config.mailbox_capacity, 1024);
///
/// let config = SiloConfig::builder()
///     .with_mailbox_capacity(500)
///     .with_idle_timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
/// assert_eq!(config.mailbox_capacity, 500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiloConfig {
    /// Identity this silo joins the cluster as. `None` generates a random id at startup.
    pub silo_id: Option<String>,

    /// Address region siblings use to classify this silo in the hierarchical ring.
    pub region_id: String,

    /// Address zone siblings use to classify this silo in the hierarchical ring.
    pub zone_id: String,

    /// Interval between outgoing heartbeats.
    pub heartbeat_interval: Duration,

    /// Staleness window past which a peer is treated as unreachable.
    pub heartbeat_timeout: Duration,

    /// Idle period before an activation is reclaimed by the GC sweep.
    pub idle_timeout: Duration,

    /// Number of stripes in the activation's striped lock.
    pub activation_lock_stripes: usize,

    /// Default mailbox capacity for bounded mailboxes.
    pub mailbox_capacity: usize,

    /// Whether mailboxes allow reentrant calls via chain id by default.
    pub reentrant: bool,

    /// Adaptive mailbox capacity tuning.
    pub adaptive_mailbox: AdaptiveMailboxConfig,

    /// Per-activation circuit breaker.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Per-activation call rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Policy used to decide when an unresponsive peer is evicted from membership.
    pub eviction_policy: EvictionPolicy,

    /// Health-score floor under `HealthScore`/`Hybrid` eviction policies.
    pub health_score_threshold: f64,

    /// Consecutive unhealthy checks required before eviction under `HealthScore`/`Hybrid`.
    pub consecutive_unhealthy_checks: u32,

    /// Virtual nodes placed per silo on the consistent hash ring.
    pub virtual_nodes_per_silo: usize,

    /// Number of routing attempts before a call is dead-lettered.
    pub router_retries: u32,

    /// Base delay between routing retries, doubled each attempt.
    pub router_retry_backoff: Duration,

    /// Capacity of the dead-letter queue.
    pub dead_letter_capacity: usize,

    /// Timeout for graceful silo shutdown.
    pub shutdown_timeout: Duration,

    /// Maximum concurrent activations (0 = unlimited).
    pub max_actors: usize,

    /// Enable monitoring event collection.
    pub enable_metrics: bool,
}

impl Default for SiloConfig {
    fn default() -> Self {
        Self {
            silo_id: None,
            region_id: "default".to_string(),
            zone_id: "default".to_string(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            activation_lock_stripes: DEFAULT_ACTIVATION_LOCK_STRIPES,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            reentrant: false,
            adaptive_mailbox: AdaptiveMailboxConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            eviction_policy: EvictionPolicy::Timeout,
            health_score_threshold: DEFAULT_HEALTH_SCORE_THRESHOLD,
            consecutive_unhealthy_checks: DEFAULT_CONSECUTIVE_UNHEALTHY_CHECKS,
            virtual_nodes_per_silo: DEFAULT_VIRTUAL_NODES_PER_SILO,
            router_retries: DEFAULT_ROUTER_RETRIES,
            router_retry_backoff: DEFAULT_ROUTER_RETRY_BACKOFF,
            dead_letter_capacity: DEFAULT_DEAD_LETTER_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            max_actors: DEFAULT_MAX_ACTORS,
            enable_metrics: DEFAULT_ENABLE_METRICS,
        }
    }
}

impl SiloConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SiloConfigBuilder {
        SiloConfigBuilder::default()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.mailbox_capacity == 0 {
            return Err("mailbox_capacity must be > 0".to_string());
        }
        if self.heartbeat_interval.is_zero() {
            return Err("heartbeat_interval must be > 0".to_string());
        }
        if self.heartbeat_timeout <= self.heartbeat_interval {
            return Err("heartbeat_timeout must be greater than heartbeat_interval".to_string());
        }
        if self.idle_timeout.is_zero() {
            return Err("idle_timeout must be > 0".to_string());
        }
        if self.activation_lock_stripes == 0 {
            return Err("activation_lock_stripes must be > 0".to_string());
        }
        if self.virtual_nodes_per_silo == 0 {
            return Err("virtual_nodes_per_silo must be > 0".to_string());
        }
        if self.shutdown_timeout.is_zero() {
            return Err("shutdown_timeout must be > 0".to_string());
        }
        if self.adaptive_mailbox.enabled && self.adaptive_mailbox.min > self.adaptive_mailbox.max {
            return Err("adaptive_mailbox.min must be <= adaptive_mailbox.max".to_string());
        }
        if !(0.0..=1.0).contains(&self.health_score_threshold) {
            return Err("health_score_threshold must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

/// Builder for [`SiloConfig`] with a fluent API.
#[derive(Debug, Default)]
pub struct SiloConfigBuilder {
    config: SiloConfig,
}

impl SiloConfigBuilder {
    /// Set the silo's own identity. Unset generates a random id at startup.
    pub fn with_silo_id(mut self, silo_id: impl Into<String>) -> Self {
        self.config.silo_id = Some(silo_id.into());
        self
    }

    /// Set the region id used when placing this silo on the hierarchical ring.
    pub fn with_region_id(mut self, region_id: impl Into<String>) -> Self {
        self.config.region_id = region_id.into();
        self
    }

    /// Set the zone id used when placing this silo on the hierarchical ring.
    pub fn with_zone_id(mut self, zone_id: impl Into<String>) -> Self {
        self.config.zone_id = zone_id.into();
        self
    }

    /// Set the interval between outgoing heartbeats.
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.config.heartbeat_interval = interval;
        self
    }

    /// Set the staleness window past which a peer is treated as unreachable.
    pub fn with_heartbeat_timeout(mut self, timeout: Duration) -> Self {
        self.config.heartbeat_timeout = timeout;
        self
    }

    /// Set the idle period before an activation is reclaimed by GC.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Set the number of stripes in the activation lock.
    pub fn with_activation_lock_stripes(mut self, stripes: usize) -> Self {
        self.config.activation_lock_stripes = stripes;
        self
    }

    /// Set the default mailbox capacity for bounded mailboxes.
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.config.mailbox_capacity = capacity;
        self
    }

    /// Enable or disable reentrant mailbox calls by default.
    pub fn with_reentrant(mut self, reentrant: bool) -> Self {
        self.config.reentrant = reentrant;
        self
    }

    /// Override the adaptive mailbox tuning configuration.
    pub fn with_adaptive_mailbox(mut self, adaptive_mailbox: AdaptiveMailboxConfig) -> Self {
        self.config.adaptive_mailbox = adaptive_mailbox;
        self
    }

    /// Override the circuit breaker configuration.
    pub fn with_circuit_breaker(mut self, circuit_breaker: CircuitBreakerConfig) -> Self {
        self.config.circuit_breaker = circuit_breaker;
        self
    }

    /// Override the rate limit configuration.
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.config.rate_limit = rate_limit;
        self
    }

    /// Set the eviction policy applied to unresponsive peers.
    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.config.eviction_policy = policy;
        self
    }

    /// Set the health-score floor under `HealthScore`/`Hybrid` eviction policies.
    pub fn with_health_score_threshold(mut self, threshold: f64) -> Self {
        self.config.health_score_threshold = threshold;
        self
    }

    /// Set the consecutive unhealthy checks required before eviction.
    pub fn with_consecutive_unhealthy_checks(mut self, checks: u32) -> Self {
        self.config.consecutive_unhealthy_checks = checks;
        self
    }

    /// Set the virtual nodes placed per silo on the hash ring.
    pub fn with_virtual_nodes_per_silo(mut self, count: usize) -> Self {
        self.config.virtual_nodes_per_silo = count;
        self
    }

    /// Set the number of routing attempts before a call is dead-lettered.
    pub fn with_router_retries(mut self, retries: u32) -> Self {
        self.config.router_retries = retries;
        self
    }

    /// Set the base delay between routing retries.
    pub fn with_router_retry_backoff(mut self, backoff: Duration) -> Self {
        self.config.router_retry_backoff = backoff;
        self
    }

    /// Set the dead-letter queue capacity.
    pub fn with_dead_letter_capacity(mut self, capacity: usize) -> Self {
        self.config.dead_letter_capacity = capacity;
        self
    }

    /// Set the timeout for graceful silo shutdown.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Set the maximum number of concurrent activations (0 = unlimited).
    pub fn with_max_actors(mut self, max: usize) -> Self {
        self.config.max_actors = max;
        self
    }

    /// Enable or disable monitoring event collection.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.config.enable_metrics = enabled;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<SiloConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}
