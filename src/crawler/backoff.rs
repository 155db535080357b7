//! Retry pacing and the rolling error window
//!
//! Both pieces are pure: the fetcher and the coordinator feed them outcomes
//! and sleep for whatever they return.

use crate::config::ScraperConfig;
use rand::Rng;
use std::collections::VecDeque;
use std::time::Duration;

/// Exponential backoff parameters for one fetch
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Attempts before giving up
    pub max_retries: u32,

    /// Delay multiplied by `2^attempt`
    pub base_delay: Duration,

    /// Upper bound of the random jitter
    pub max_jitter: Duration,
}

impl BackoffPolicy {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_jitter: Duration::from_millis(config.max_jitter_ms),
        }
    }

    /// `base_delay * 2^attempt + jitter`
    pub fn backoff(&self, attempt: u32, jitter: Duration) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).saturating_add(jitter)
    }

    /// Draws a jitter in `0..=max_jitter`
    pub fn jitter(&self) -> Duration {
        let max = self.max_jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }
}

/// Why an attempt failed, as far as pacing is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// HTTP 403
    Blocked,
    /// Connection, timeout or body read failure
    Transient,
}

/// Wait times between the attempts of a single fetch
///
/// Before attempt `n` the fetcher waits `backoff(n)`. After a blocked
/// attempt, the previous wait is doubled and added on top, so the wait
/// before attempt `n + 1` is always at least twice the wait before attempt
/// `n`. After a transient failure the extra wait is `base_delay * 2^n`.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    policy: BackoffPolicy,
    attempt: u32,
    last_wait: Duration,
}

impl RetrySchedule {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            last_wait: Duration::ZERO,
        }
    }

    /// Wait before the first attempt
    pub fn initial(&mut self, jitter: Duration) -> Duration {
        self.attempt = 0;
        self.last_wait = self.policy.backoff(0, jitter);
        self.last_wait
    }

    /// Wait before the next attempt, given how the current one failed
    pub fn after_failure(&mut self, outcome: AttemptOutcome, jitter: Duration) -> Duration {
        let failed = self.attempt;
        self.attempt += 1;

        let extra = match outcome {
            AttemptOutcome::Blocked => self.last_wait.saturating_mul(2),
            AttemptOutcome::Transient => self.policy.backoff(failed, Duration::ZERO),
        };

        self.last_wait = self.policy.backoff(self.attempt, jitter).saturating_add(extra);
        self.last_wait
    }

    /// Number of failed attempts recorded so far
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

/// Bounded history of the most recent errors of a run
///
/// Only whether each error was a blocking response matters for pacing.
#[derive(Debug, Clone)]
pub struct ErrorWindow {
    recent: VecDeque<bool>,
    capacity: usize,
    threshold: usize,
}

impl ErrorWindow {
    /// Creates a window of `capacity` errors that trips when strictly more
    /// than `threshold` of them were blocked
    pub fn new(capacity: usize, threshold: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            threshold,
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.error_window, config.blocked_threshold)
    }

    /// Records an error, evicting the oldest one when full
    pub fn record(&mut self, blocked: bool) {
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(blocked);
    }

    pub fn blocked_count(&self) -> usize {
        self.recent.iter().filter(|blocked| **blocked).count()
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// True when the recent blocked density calls for a long pause
    pub fn should_cool_down(&self) -> bool {
        self.blocked_count() > self.threshold
    }
}

/// Draws a pause in `min..=max`
pub fn random_pause(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let millis = rand::thread_rng().gen_range(min.as_millis() as u64..=max.as_millis() as u64);
    Duration::from_millis(millis)
}
