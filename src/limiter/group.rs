//! Quota Group Module
//!
//! Composes several named sliding-window limiters (for example per-minute
//! and per-hour quotas) into one admission decision.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::clock::SharedClock;
use crate::error::Result;
use crate::limiter::{LimiterStats, WindowLimiter};

// == Quota Group ==
/// Named limiters evaluated together, in registration order.
///
/// Limiters keep independent records; the group only delegates.
#[derive(Debug)]
pub struct QuotaGroup {
    limiters: Vec<WindowLimiter>,
    clock: SharedClock,
}

impl QuotaGroup {
    // == Constructor ==
    /// Creates an empty group. An empty group admits everything.
    pub fn new(clock: SharedClock) -> Self {
        Self {
            limiters: Vec::new(),
            clock,
        }
    }

    // == Add Limiter ==
    /// Registers a limiter under `name`.
    ///
    /// Re-registering a name replaces the old limiter (and its records) in
    /// place, keeping its position in the evaluation order.
    pub fn add_limiter(&mut self, name: impl Into<String>, limit: usize, window: Duration) {
        let limiter = WindowLimiter::new(name, limit, window, self.clock.clone());

        let position = self
            .limiters
            .iter()
            .position(|existing| existing.name() == limiter.name());

        match position {
            Some(index) => self.limiters[index] = limiter,
            None => self.limiters.push(limiter),
        }
    }

    /// Builder form of [`add_limiter`](Self::add_limiter).
    pub fn with_limiter(mut self, name: impl Into<String>, limit: usize, window: Duration) -> Self {
        self.add_limiter(name, limit, window);
        self
    }

    // == Can Proceed ==
    /// True only if every limiter has headroom.
    pub fn can_proceed(&mut self) -> bool {
        self.limiters.iter_mut().all(WindowLimiter::can_proceed)
    }

    // == Record ==
    /// Records a request on every limiter, in registration order.
    ///
    /// Not transactional: if a later limiter is at capacity its error is
    /// returned, but limiters before it have already recorded the request.
    /// Use [`try_proceed`](Self::try_proceed) to check and record atomically.
    pub fn record(&mut self) -> Result<()> {
        for limiter in &mut self.limiters {
            limiter.record()?;
        }
        Ok(())
    }

    // == Try Proceed ==
    /// Checks every limiter, then records on all of them only if all admit.
    ///
    /// Returns whether the request was admitted. Nothing is recorded on denial.
    pub fn try_proceed(&mut self) -> bool {
        if !self.can_proceed() {
            debug!("Request denied by quota group");
            return false;
        }

        for limiter in &mut self.limiters {
            limiter.commit();
        }
        true
    }

    // == Time Until Next Slot ==
    /// The longest wait among all limiters.
    pub fn time_until_next_slot(&mut self) -> Duration {
        self.limiters
            .iter_mut()
            .map(WindowLimiter::time_until_next_slot)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    // == Stats ==
    /// Usage of every limiter, keyed by name.
    pub fn stats(&mut self) -> BTreeMap<String, LimiterStats> {
        self.limiters
            .iter_mut()
            .map(|limiter| (limiter.name().to_string(), limiter.stats()))
            .collect()
    }

    // == Blocking Limiter ==
    /// The first limiter, in registration order, currently denying admission.
    pub fn blocking_limiter(&mut self) -> Option<(String, LimiterStats)> {
        self.blocking_limiter_mut()
            .map(|limiter| (limiter.name().to_string(), limiter.stats()))
    }

    /// Mutable access to the first limiter currently denying admission.
    pub fn blocking_limiter_mut(&mut self) -> Option<&mut WindowLimiter> {
        for limiter in &mut self.limiters {
            if !limiter.can_proceed() {
                return Some(limiter);
            }
        }
        None
    }

    // == Reset All ==
    pub fn reset_all(&mut self) {
        for limiter in &mut self.limiters {
            limiter.reset();
        }
    }

    /// Limiter names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.limiters.iter().map(WindowLimiter::name).collect()
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }
}
