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

use std::time::Duration;

/// Counters collected during one suggestion search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BnbSolverStatistics {
    /// Nodes entered, the root included.
    pub nodes_explored: u64,
    /// Levels undone.
    pub backtracks: u64,
    /// Decisions popped from the stack.
    pub decisions_generated: u64,
    /// The deepest level reached.
    pub max_depth: u64,
    /// Values skipped because they hard-conflict with placed requests.
    pub prunings_infeasible: u64,
    /// Decisions whose optimistic completion cannot enter the frontier.
    pub prunings_bound: u64,
    /// Decisions exceeding the configured number of changes.
    pub prunings_change_limit: u64,
    /// Complete suggestions offered to the frontier.
    pub suggestions_found: u64,
    /// Offers the frontier accepted.
    pub suggestions_admitted: u64,
    /// Total time spent in the search.
    pub time_total: Duration,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_decision_generated(&mut self) {
        self.decisions_generated = self.decisions_generated.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self, count: u64) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(count);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_change_limit(&mut self) {
        self.prunings_change_limit = self.prunings_change_limit.saturating_add(1);
    }

    #[inline]
    pub fn on_suggestion_found(&mut self, admitted: bool) {
        self.suggestions_found = self.suggestions_found.saturating_add(1);
        if admitted {
            self.suggestions_admitted = self.suggestions_admitted.saturating_add(1);
        }
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Returns the total number of pruned branches.
    #[inline]
    pub fn prunings_total(&self) -> u64 {
        self.prunings_infeasible
            .saturating_add(self.prunings_bound)
            .saturating_add(self.prunings_change_limit)
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Suggestion Search Statistics:")?;
        writeln!(f, "  Nodes explored:         {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:             {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:      {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:    {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (infeasible):  {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):       {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (changes):     {}", self.prunings_change_limit)?;
        writeln!(f, "  Suggestions found:      {}", self.suggestions_found)?;
        writeln!(f, "  Suggestions admitted:   {}", self.suggestions_admitted)?;
        writeln!(f, "  Total time:             {:.2?}", self.time_total)?;
        Ok(())
    }
}
