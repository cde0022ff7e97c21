//! Per-activation circuit breaker and call rate limiter gating dispatch
//! (§4.4, §6, §8 S6).

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc}; // §3.2 MANDATORY

// Layer 3: Internal module imports
use crate::system::{CircuitBreakerConfig, OverflowPolicy, RateLimitConfig};

#[derive(Debug, Clone, Copy)]
enum State {
    Closed { consecutive_failures: u32 },
    Open { opened_at: DateTime<Utc> },
    HalfOpen { successes: u32 },
}

/// Closed/Open/Half-Open state machine over one activation's call outcomes.
///
/// Disabled (the default) always allows calls through. Enabled,
/// `failure_threshold` consecutive handler faults open the breaker for
/// `open_timeout`; once that elapses the next call is admitted as a trial,
/// and `success_threshold` consecutive trial successes close the breaker
/// again. A fault during the trial period reopens it immediately.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: StdMutex<State>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            state: StdMutex::new(State::Closed {
                consecutive_failures: 0,
            }),
        }
    }

    /// Whether a call may proceed right now. Flips `Open` to `HalfOpen`
    /// once `open_timeout` has elapsed since the breaker opened.
    pub fn allow(&self) -> bool {
        if !self.config.enabled {
            return true;
        }
        let mut state = self.state.lock().expect("circuit breaker poisoned");
        match *state {
            State::Closed { .. } | State::HalfOpen { .. } => true,
            State::Open { opened_at } => {
                let elapsed = Utc::now().signed_duration_since(opened_at);
                let timeout = chrono::Duration::from_std(self.config.open_timeout).unwrap_or_default();
                if elapsed >= timeout {
                    *state = State::HalfOpen { successes: 0 };
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a successful call outcome.
    pub fn record_success(&self) {
        if !self.config.enabled {
            return;
        }
        let mut state = self.state.lock().expect("circuit breaker poisoned");
        *state = match *state {
            State::Closed { .. } => State::Closed {
                consecutive_failures: 0,
            },
            State::HalfOpen { successes } => {
                let successes = successes + 1;
                if successes >= self.config.success_threshold {
                    State::Closed {
                        consecutive_failures: 0,
                    }
                } else {
                    State::HalfOpen { successes }
                }
            }
            open @ State::Open { .. } => open,
        };
    }

    /// Record a handler fault (§7 `HandlerFault`) as a breaker failure.
    pub fn record_failure(&self) {
        if !self.config.enabled {
            return;
        }
        let mut state = self.state.lock().expect("circuit breaker poisoned");
        *state = match *state {
            State::Closed {
                consecutive_failures,
            } => {
                let consecutive_failures = consecutive_failures + 1;
                if consecutive_failures >= self.config.failure_threshold {
                    State::Open { opened_at: Utc::now() }
                } else {
                    State::Closed {
                        consecutive_failures,
                    }
                }
            }
            State::HalfOpen { .. } => State::Open { opened_at: Utc::now() },
            open @ State::Open { .. } => open,
        };
    }
}

/// Sliding-window call counter enforcing [`RateLimitConfig`] (§6 `RateLimit`).
///
/// Disabled (the default) always admits. Enabled, it keeps the timestamps
/// of calls admitted within the trailing `window` and rejects once
/// `max_per_window` is reached; `overflow` only affects what the caller is
/// told (`Queue` falls through to the mailbox's own backpressure instead
/// of being treated as a rate-limit rejection here).
pub struct RateLimiter {
    config: RateLimitConfig,
    timestamps: StdMutex<VecDeque<DateTime<Utc>>>,
}

/// Outcome of a [`RateLimiter::check`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitOutcome {
    /// Admit the call.
    Admit,
    /// Reject the call; the overflow policy was `Drop` or `Reject`.
    Reject,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            timestamps: StdMutex::new(VecDeque::new()),
        }
    }

    /// Record a call attempt now and report whether it should be admitted.
    pub fn check(&self) -> RateLimitOutcome {
        if !self.config.enabled {
            return RateLimitOutcome::Admit;
        }

        let now = Utc::now();
        let window = chrono::Duration::from_std(self.config.window).unwrap_or_default();
        let mut timestamps = self.timestamps.lock().expect("rate limiter poisoned");
        while let Some(front) = timestamps.front() {
            if now.signed_duration_since(*front) > window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() as u32 >= self.config.max_per_window {
            return match self.config.overflow {
                OverflowPolicy::Queue => RateLimitOutcome::Admit,
                OverflowPolicy::Drop | OverflowPolicy::Reject => RateLimitOutcome::Reject,
            };
        }

        timestamps.push_back(now);
        RateLimitOutcome::Admit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn breaker_config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            enabled: true,
            failure_threshold: 3,
            success_threshold: 2,
            open_timeout: Duration::from_millis(50),
            sampling_window: Duration::from_secs(60),
        }
    }

    #[test]
    fn disabled_breaker_always_allows() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig::default());
        for _ in 0..10 {
            breaker.record_failure();
        }
        assert!(breaker.allow());
    }

    #[test]
    fn opens_after_consecutive_failures_and_rejects() {
        let breaker = CircuitBreaker::new(breaker_config());
        breaker.record_failure();
        breaker.record_failure();
        assert!(breaker.allow());
        breaker.record_failure();
        assert!(!breaker.allow());
    }

    #[tokio::test]
    async fn half_opens_after_timeout_and_closes_on_successes() {
        let breaker = CircuitBreaker::new(breaker_config());
        for _ in 0..3 {
            breaker.record_failure();
        }
        assert!(!breaker.allow());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(breaker.allow());
        breaker.record_success();
        assert!(breaker.allow());
        breaker.record_success();

        // Closed again: a single failure no longer opens it.
        breaker.record_failure();
        assert!(breaker.allow());
    }

    #[tokio::test]
    async fn fault_during_half_open_reopens_immediately() {
        let breaker = CircuitBreaker::new(breaker_config());
        for _ in 0..3 {
            breaker.record_failure();
        }
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(breaker.allow());
        breaker.record_failure();
        assert!(!breaker.allow());
    }

    #[test]
    fn disabled_rate_limiter_always_admits() {
        let limiter = RateLimiter::new(RateLimitConfig::default());
        for _ in 0..10_000 {
            assert_eq!(limiter.check(), RateLimitOutcome::Admit);
        }
    }

    #[test]
    fn rejects_once_window_is_exhausted() {
        let limiter = RateLimiter::new(RateLimitConfig {
            enabled: true,
            max_per_window: 2,
            window: Duration::from_secs(1),
            overflow: OverflowPolicy::Reject,
        });
        assert_eq!(limiter.check(), RateLimitOutcome::Admit);
        assert_eq!(limiter.check(), RateLimitOutcome::Admit);
        assert_eq!(limiter.check(), RateLimitOutcome::Reject);
    }

    #[test]
    fn queue_overflow_admits_past_the_window() {
        let limiter = RateLimiter::new(RateLimitConfig {
            enabled: true,
            max_per_window: 1,
            window: Duration::from_secs(1),
            overflow: OverflowPolicy::Queue,
        });
        assert_eq!(limiter.check(), RateLimitOutcome::Admit);
        assert_eq!(limiter.check(), RateLimitOutcome::Admit);
    }
}
