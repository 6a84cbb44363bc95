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

use crate::stats::BnbSolverStatistics;
use docket_model::suggestion::Suggestion;
use std::time::Duration;

/// Why a suggestion search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionTermination {
    /// The whole tree was explored; the suggestions are the best ones.
    Exhausted,
    /// The whole tree was explored and no suggestion exists.
    Infeasible,
    /// The deadline passed; the suggestions are the best ones found so far.
    TimeoutReached,
}

impl std::fmt::Display for SuggestionTermination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestionTermination::Exhausted => write!(f, "Exhausted"),
            SuggestionTermination::Infeasible => write!(f, "Infeasible"),
            SuggestionTermination::TimeoutReached => write!(f, "TimeoutReached"),
        }
    }
}

/// Result of a suggestion search after termination.
#[derive(Debug, Clone)]
pub struct SuggestionOutcome {
    suggestions: Vec<Suggestion>,
    termination: SuggestionTermination,
    statistics: BnbSolverStatistics,
}

impl SuggestionOutcome {
    /// Creates an outcome from a completed search.
    #[inline]
    pub fn exhausted(suggestions: Vec<Suggestion>, statistics: BnbSolverStatistics) -> Self {
        let termination = if suggestions.is_empty() {
            SuggestionTermination::Infeasible
        } else {
            SuggestionTermination::Exhausted
        };
        Self {
            suggestions,
            termination,
            statistics,
        }
    }

    /// Creates an outcome from a search interrupted by the deadline.
    #[inline]
    pub fn timed_out(suggestions: Vec<Suggestion>, statistics: BnbSolverStatistics) -> Self {
        Self {
            suggestions,
            termination: SuggestionTermination::TimeoutReached,
            statistics,
        }
    }

    /// Creates an empty outcome for a search that had nothing to return.
    #[inline]
    pub fn empty(termination: SuggestionTermination, statistics: BnbSolverStatistics) -> Self {
        Self {
            suggestions: Vec::new(),
            termination,
            statistics,
        }
    }

    /// Returns the suggestions, best first.
    #[inline]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    #[inline]
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.suggestions
    }

    #[inline]
    pub fn best(&self) -> Option<&Suggestion> {
        self.suggestions.first()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    #[inline]
    pub fn termination(&self) -> SuggestionTermination {
        self.termination
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Returns the wall-clock time of the search.
    #[inline]
    pub fn elapsed_time(&self) -> Duration {
        self.statistics.time_total
    }

    #[inline]
    pub fn timeout_reached(&self) -> bool {
        self.termination == SuggestionTermination::TimeoutReached
    }
}

impl std::fmt::Display for SuggestionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuggestionOutcome(termination: {}, suggestions: {}, elapsed: {:.2?})",
            self.termination,
            self.suggestions.len(),
            self.statistics.time_total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_without_suggestions_is_infeasible() {
        let outcome = SuggestionOutcome::exhausted(Vec::new(), BnbSolverStatistics::default());
        assert_eq!(outcome.termination(), SuggestionTermination::Infeasible);
        assert!(!outcome.timeout_reached());
        assert!(outcome.best().is_none());
    }

    #[test]
    fn test_timeout_is_reported_as_data() {
        let stats = BnbSolverStatistics {
            time_total: Duration::from_millis(12),
            ..Default::default()
        };
        let outcome = SuggestionOutcome::timed_out(Vec::new(), stats);
        assert!(outcome.timeout_reached());
        assert!(outcome.is_empty());
        assert_eq!(outcome.elapsed_time(), Duration::from_millis(12));
        assert_eq!(
            format!("{}", outcome.termination()),
            "TimeoutReached"
        );
    }
}
