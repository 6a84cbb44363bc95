// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::time::{Duration, Instant};

/// Number of `poll` calls between two reads of the clock.
const POLL_INTERVAL: u32 = 256;

/// Wall-clock budget of one suggestion search.
///
/// Once `expired` has observed the deadline it latches, so a search that
/// saw the deadline never resumes. The search loop calls `expired` once per
/// step; the enumeration that precedes it calls the cheaper `poll` once per
/// unit of work.
#[derive(Debug, Clone)]
pub struct TimeoutGovernor {
    start: Instant,
    budget: Duration,
    expired: bool,
    ticks: u32,
    checks: u64,
    check_limit: Option<u64>,
}

impl TimeoutGovernor {
    /// Starts the clock with the given budget.
    #[inline]
    pub fn start(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
            expired: false,
            ticks: 0,
            checks: 0,
            check_limit: None,
        }
    }

    /// A governor that never expires.
    #[inline]
    pub fn unbounded() -> Self {
        Self::start(Duration::MAX)
    }

    /// Starts a governor that also expires on the first `expired` call
    /// after `checks` calls, whatever the clock says.
    ///
    /// The search calls `expired` once per step, so this bounds a search
    /// by work instead of time and makes a cut-off search reproducible.
    #[inline]
    pub fn with_check_limit(budget: Duration, checks: u64) -> Self {
        Self {
            check_limit: Some(checks),
            ..Self::start(budget)
        }
    }

    /// Returns `true` once the budget has been used up.
    #[inline]
    pub fn expired(&mut self) -> bool {
        if !self.expired {
            self.checks += 1;
            if self.start.elapsed() >= self.budget
                || self.check_limit.is_some_and(|limit| self.checks > limit)
            {
                self.expired = true;
            }
        }
        self.expired
    }

    /// Counts one unit of work and reads the clock every `POLL_INTERVAL`
    /// units. Returns `true` once the budget has been used up.
    #[inline]
    pub fn poll(&mut self) -> bool {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % POLL_INTERVAL == 0 {
            self.expired()
        } else {
            self.expired
        }
    }

    /// Returns `true` if a previous call to `expired` saw the deadline.
    #[inline]
    pub fn has_expired(&self) -> bool {
        self.expired
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns the deadline, `None` if it is not representable.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.start.checked_add(self.budget)
    }
}

impl std::fmt::Display for TimeoutGovernor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimeoutGovernor(budget: {}ms, elapsed: {}ms, expired: {})",
            self.budget.as_millis(),
            self.elapsed().as_millis(),
            self.expired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_expires_immediately() {
        let mut g = TimeoutGovernor::start(Duration::ZERO);
        assert!(g.expired());
        assert!(g.has_expired());
    }

    #[test]
    fn test_large_budget_does_not_expire() {
        let mut g = TimeoutGovernor::start(Duration::from_secs(3600));
        assert!(!g.expired());
        assert!(!g.has_expired());
        assert!(g.deadline().is_some());
        assert_eq!(g.budget(), Duration::from_secs(3600));
    }

    #[test]
    fn test_check_limit_expires_after_given_checks() {
        let mut g = TimeoutGovernor::with_check_limit(Duration::from_secs(3600), 2);
        assert!(!g.expired());
        assert!(!g.expired());
        assert!(g.expired());
        assert!(g.expired());
        assert!(TimeoutGovernor::with_check_limit(Duration::from_secs(3600), 0).expired());
    }

    #[test]
    fn test_poll_reads_the_clock_periodically() {
        let mut g = TimeoutGovernor::start(Duration::ZERO);
        for _ in 1..POLL_INTERVAL {
            assert!(!g.poll());
        }
        assert!(g.poll());
        assert!(g.has_expired());
        assert!(!TimeoutGovernor::unbounded().expired());
    }

    #[test]
    fn test_expiry_latches() {
        let mut g = TimeoutGovernor::start(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(g.expired());
        assert!(g.elapsed() >= Duration::from_millis(1));
        assert!(g.expired());
    }
}
