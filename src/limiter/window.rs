//! Sliding Window Limiter Module
//!
//! Enforces `limit` requests per rolling `window` from timestamped records.
//!
//! A record expires exactly `window` after it was made. Records are only
//! pruned when the limiter is queried.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::SharedClock;
use crate::error::{GuardError, Result};
use crate::limiter::LimiterStats;

// == Window Limiter ==
/// Sliding-window rate limiter.
#[derive(Debug)]
pub struct WindowLimiter {
    /// Name used in errors and logs
    name: String,
    /// Requests allowed per window
    limit: usize,
    /// Rolling window length
    window: Duration,
    /// Request timestamps (Unix milliseconds), oldest first
    records: VecDeque<u64>,
    clock: SharedClock,
}

impl WindowLimiter {
    // == Constructor ==
    /// Creates a limiter admitting `limit` requests per `window`.
    pub fn new(name: impl Into<String>, limit: usize, window: Duration, clock: SharedClock) -> Self {
        Self {
            name: name.into(),
            limit,
            window,
            records: VecDeque::with_capacity(limit.min(1024)),
            clock,
        }
    }

    // == Can Proceed ==
    /// Returns true if a request would be admitted now.
    pub fn can_proceed(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.prune(now);
        self.records.len() < self.limit
    }

    // == Record ==
    /// Records a request made now.
    ///
    /// Fails with [`GuardError::QuotaExceeded`] if the limiter is already at
    /// capacity; callers should check [`can_proceed`](Self::can_proceed) first
    /// or use [`try_proceed`](Self::try_proceed).
    pub fn record(&mut self) -> Result<()> {
        let now = self.clock.now_ms();
        self.prune(now);

        if self.records.len() >= self.limit {
            warn!(
                limiter = %self.name,
                limit = self.limit,
                "Request recorded while at capacity"
            );
            return Err(self.quota_exceeded(now));
        }

        self.records.push_back(now);
        Ok(())
    }

    // == Try Proceed ==
    /// Records a request if under the limit. Returns whether it was admitted.
    pub fn try_proceed(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.prune(now);

        if self.records.len() < self.limit {
            self.records.push_back(now);
            true
        } else {
            debug!(limiter = %self.name, "Request denied by sliding window");
            false
        }
    }

    // == Time Until Next Slot ==
    /// Time until a request would be admitted, rounded up to whole seconds.
    ///
    /// Zero when under the limit. A zero-limit limiter never frees a slot and
    /// reports its full window.
    pub fn time_until_next_slot(&mut self) -> Duration {
        let now = self.clock.now_ms();
        self.prune(now);
        self.wait_at(now)
    }

    // == Stats ==
    /// Returns current usage.
    pub fn stats(&mut self) -> LimiterStats {
        let now = self.clock.now_ms();
        self.prune(now);
        LimiterStats::new(self.records.len(), self.limit, self.wait_at(now), self.window)
    }

    // == Reset ==
    /// Drops every record.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    // == Denial Message ==
    /// User-facing explanation of a denial.
    ///
    /// Unauthenticated callers are pointed at authentication, which grants a
    /// larger quota.
    pub fn denial_message(&mut self, authenticated: bool) -> String {
        let stats = self.stats();
        if authenticated {
            format!(
                "Rate limit reached ({}/{}). Wait {} seconds.",
                stats.used, stats.limit, stats.time_until_reset
            )
        } else {
            format!(
                "Rate limit reached! You get {} requests per {} seconds without authentication.\n\n\
                 Authenticate for a higher quota, or wait {} seconds...\n\n\
                 Cached data may still be available.",
                stats.limit, stats.window, stats.time_until_reset
            )
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    // == Internal Helpers ==
    /// Appends a record without checking the limit.
    ///
    /// Only for callers that checked headroom inside the same critical section.
    pub(crate) fn commit(&mut self) {
        let now = self.clock.now_ms();
        self.records.push_back(now);
    }

    pub(crate) fn quota_exceeded(&self, now: u64) -> GuardError {
        GuardError::QuotaExceeded {
            name: self.name.clone(),
            limit: self.limit,
            window: self.window,
            retry_after: self.wait_at(now),
        }
    }

    fn prune(&mut self, now: u64) {
        let window_ms = self.window.as_millis();
        self.records
            .retain(|&at| u128::from(now.saturating_sub(at)) < window_ms);
    }

    fn wait_at(&self, now: u64) -> Duration {
        if self.records.len() < self.limit {
            return Duration::ZERO;
        }

        let remaining_ms = match self.records.front() {
            Some(&oldest) => {
                let expires_at = u128::from(oldest) + self.window.as_millis();
                expires_at.saturating_sub(u128::from(now))
            }
            None => self.window.as_millis(),
        };

        Duration::from_secs(remaining_ms.div_ceil(1000) as u64)
    }
}
