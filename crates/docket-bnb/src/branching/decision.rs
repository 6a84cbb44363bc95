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

use crate::{eval::cost_model::CostModel, plan::SearchPlan, state::SearchState};
use docket_model::{cost::Cost, index::RequestIndex, suggestion::PenaltyCounts};
use std::iter::FusedIterator;

/// The value picked for one request at one node.
///
/// `Enroll(i)` refers to the `i`-th candidate of the request in the
/// `CandidateCatalog`; for a free-time request the single candidate keeps
/// the free time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Choice {
    Enroll(u32),
    Unassigned,
}

impl Choice {
    #[inline]
    pub fn is_assigned(&self) -> bool {
        matches!(self, Choice::Enroll(_))
    }

    /// Returns the candidate index, `None` if unassigned.
    #[inline]
    pub fn candidate(&self) -> Option<u32> {
        match self {
            Choice::Enroll(i) => Some(*i),
            Choice::Unassigned => None,
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Choice::Enroll(i) => write!(f, "Enroll({})", i),
            Choice::Unassigned => write!(f, "Unassigned"),
        }
    }
}

/// A decision to give `request` the value `choice`, along with the
/// penalty totals and cost of the partial suggestion after applying it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    cost: Cost,
    penalties: PenaltyCounts,
    request: RequestIndex,
    choice: Choice,
}

impl Decision {
    #[inline]
    pub fn new(request: RequestIndex, choice: Choice, penalties: PenaltyCounts, cost: Cost) -> Self {
        Self {
            cost,
            penalties,
            request,
            choice,
        }
    }

    /// Tries to build the decision of placing `choice` for `request` on top
    /// of `state`. Returns `None` if the choice hard-conflicts with a request
    /// that is already placed.
    #[inline]
    pub fn try_new(
        costs: &CostModel<'_>,
        state: &SearchState,
        request: RequestIndex,
        choice: Choice,
        static_penalties: &PenaltyCounts,
    ) -> Option<Self> {
        debug_assert!(
            !state.is_assigned(request),
            "called `Decision::try_new` with request {} which is already assigned",
            request
        );

        let delta = costs.placement(state, request, choice, static_penalties)?;
        let penalties = *state.penalties() + delta;
        Some(Self::new(request, choice, penalties, costs.cost(&penalties)))
    }

    #[inline]
    pub fn request(&self) -> RequestIndex {
        self.request
    }

    #[inline]
    pub fn choice(&self) -> Choice {
        self.choice
    }

    /// Returns the penalty totals after this decision.
    #[inline]
    pub fn penalties(&self) -> &PenaltyCounts {
        &self.penalties
    }

    /// Returns the cost of the partial suggestion after this decision.
    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decision(request: {}, choice: {}, cost: {})",
            self.request, self.choice, self.cost
        )
    }
}

/// Produces the children of a search node.
///
/// A builder is asked for the decisions of the request at the current depth
/// of the `SearchPlan`. It returns them in **reverse** exploration order:
/// the engine pushes them onto a LIFO stack, so the last decision yielded is
/// explored first. Decisions that hard-conflict with the placed requests
/// must not be yielded.
pub trait DecisionBuilder {
    type DecisionIterator<'a>: Iterator<Item = Decision> + FusedIterator + 'a
    where
        Self: 'a;

    fn name(&self) -> &str;

    fn next_decisions<'a>(
        &'a mut self,
        costs: &CostModel<'_>,
        plan: &SearchPlan,
        state: &SearchState,
    ) -> Self::DecisionIterator<'a>;
}
