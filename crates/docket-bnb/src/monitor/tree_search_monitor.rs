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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `PruneReason`. Callbacks follow
//! the lifecycle of one suggestion search:
//! enter → step → {prune | decisions/descend/backtrack} → suggestion → exit.
//! The running `BnbSolverStatistics` accompany every callback.
//!
//! Methods take `&mut self`; a monitor belongs to exactly one search. Keep
//! callbacks cheap, they run on the hot path.

use crate::{branching::decision::Decision, state::SearchState, stats::BnbSolverStatistics};
use docket_model::{model::SchedulingModel, request::Student, suggestion::Suggestion};

/// Reasons for discarding a branch.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The value hard-conflicts with a placed request.
    Infeasible,
    /// The optimistic completion cannot enter the full frontier.
    BoundDominated,
    /// The branch changes more requests than allowed.
    ChangeLimit,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::ChangeLimit => write!(f, "ChangeLimit"),
        }
    }
}

/// Receives the events of a suggestion search.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once before the root is expanded.
    fn on_enter_search(
        &mut self,
        model: &SchedulingModel,
        student: &Student,
        statistics: &BnbSolverStatistics,
    );

    /// Called once after the search stopped, with the final statistics.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);

    /// Called at each step of the search loop.
    fn on_step(&mut self, _state: &SearchState, _statistics: &BnbSolverStatistics) {}

    /// Called when a decision is discarded without descending.
    fn on_prune(
        &mut self,
        _state: &SearchState,
        _reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    /// Called when the decisions of a new level have been pushed.
    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState,
        _count: usize,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    /// Called after `decision` has been applied to `state`.
    fn on_descend(
        &mut self,
        _state: &SearchState,
        _decision: Decision,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    /// Called before a level is undone.
    fn on_backtrack(&mut self, _state: &SearchState, _statistics: &BnbSolverStatistics) {}

    /// Called for every complete suggestion offered to the frontier.
    fn on_suggestion_found(
        &mut self,
        _suggestion: &Suggestion,
        _admitted: bool,
        _statistics: &BnbSolverStatistics,
    ) {
    }

    /// Called when the deadline stopped the search.
    fn on_timeout(&mut self, _statistics: &BnbSolverStatistics) {}
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn on_enter_search(
        &mut self,
        model: &SchedulingModel,
        student: &Student,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_enter_search(model, student, statistics)
    }

    #[inline]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_exit_search(statistics)
    }

    #[inline]
    fn on_step(&mut self, state: &SearchState, statistics: &BnbSolverStatistics) {
        (**self).on_step(state, statistics)
    }

    #[inline]
    fn on_prune(
        &mut self,
        state: &SearchState,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_prune(state, reason, statistics)
    }

    #[inline]
    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState,
        count: usize,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_decisions_enqueued(state, count, statistics)
    }

    #[inline]
    fn on_descend(
        &mut self,
        state: &SearchState,
        decision: Decision,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_descend(state, decision, statistics)
    }

    #[inline]
    fn on_backtrack(&mut self, state: &SearchState, statistics: &BnbSolverStatistics) {
        (**self).on_backtrack(state, statistics)
    }

    #[inline]
    fn on_suggestion_found(
        &mut self,
        suggestion: &Suggestion,
        admitted: bool,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_suggestion_found(suggestion, admitted, statistics)
    }

    #[inline]
    fn on_timeout(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_timeout(statistics)
    }
}
