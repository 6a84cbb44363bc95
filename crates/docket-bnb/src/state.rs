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

//! Search state of the suggestion engine.
//!
//! `SearchState` is the partial suggestion under construction: which
//! requests have been placed, with which value, in which order, and the
//! running penalty totals and cost. It is mutated only through the
//! `SearchTrail`, which records enough to undo every placement on backtrack.
//!
//! Invariants (debug-checked):
//! - `placed.len()` equals the number of set bits in `assigned`.
//! - `choices[r]` is meaningful only while `assigned[r]` is set.

use crate::branching::decision::Choice;
use docket_model::{cost::Cost, index::RequestIndex, suggestion::PenaltyCounts};
use fixedbitset::FixedBitSet;

#[derive(Debug, Clone)]
pub struct SearchState {
    placed: Vec<RequestIndex>,
    choices: Vec<Choice>,
    assigned: FixedBitSet,
    penalties: PenaltyCounts,
    cost: Cost,
}

impl SearchState {
    /// Creates an empty state for a student with `num_requests` requests.
    #[inline]
    pub fn new(num_requests: usize) -> Self {
        Self {
            placed: Vec::with_capacity(num_requests),
            choices: vec![Choice::Unassigned; num_requests],
            assigned: FixedBitSet::with_capacity(num_requests),
            penalties: PenaltyCounts::default(),
            cost: Cost::ZERO,
        }
    }

    #[inline]
    pub fn num_requests(&self) -> usize {
        self.choices.len()
    }

    /// Returns the number of placed requests.
    #[inline]
    pub fn depth(&self) -> usize {
        self.placed.len()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.placed.len() == self.choices.len()
    }

    /// Returns the placed requests in placement order.
    #[inline]
    pub fn placed(&self) -> &[RequestIndex] {
        &self.placed
    }

    /// Returns `true` if `request` has been placed, with any value
    /// including `Choice::Unassigned`.
    ///
    /// # Panics
    ///
    /// Panics if `request` is not within `0..num_requests()`.
    #[inline]
    pub fn is_assigned(&self, request: RequestIndex) -> bool {
        debug_assert!(
            request.get() < self.num_requests(),
            "called `SearchState::is_assigned` with request index out of bounds: the len is {} but the index is {}",
            self.num_requests(),
            request.get()
        );
        self.assigned.contains(request.get())
    }

    /// Returns the value of `request`, `None` if it has not been placed yet.
    #[inline]
    pub fn choice(&self, request: RequestIndex) -> Option<Choice> {
        if self.is_assigned(request) {
            Some(self.choices[request.get()])
        } else {
            None
        }
    }

    /// Returns the placed requests together with their values.
    #[inline]
    pub fn iter_placed(&self) -> impl Iterator<Item = (RequestIndex, Choice)> + '_ {
        self.placed.iter().map(|&r| (r, self.choices[r.get()]))
    }

    #[inline]
    pub fn penalties(&self) -> &PenaltyCounts {
        &self.penalties
    }

    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Places `request` with `choice` and installs the new totals.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the request is already placed.
    #[inline]
    pub fn place(
        &mut self,
        request: RequestIndex,
        choice: Choice,
        penalties: PenaltyCounts,
        cost: Cost,
    ) {
        debug_assert!(
            !self.is_assigned(request),
            "called `SearchState::place` with request {} which is already assigned",
            request
        );
        self.assigned.insert(request.get());
        self.choices[request.get()] = choice;
        self.placed.push(request);
        self.penalties = penalties;
        self.cost = cost;
    }

    /// Removes the most recently placed request and restores the totals
    /// that were current before it. Returns the removed request.
    #[inline]
    pub fn unplace_last(&mut self, penalties: PenaltyCounts, cost: Cost) -> Option<RequestIndex> {
        let request = self.placed.pop()?;
        self.assigned.set(request.get(), false);
        self.choices[request.get()] = Choice::Unassigned;
        self.penalties = penalties;
        self.cost = cost;
        Some(request)
    }

    /// Clears every placement.
    #[inline]
    pub fn reset(&mut self) {
        self.placed.clear();
        self.choices.fill(Choice::Unassigned);
        self.assigned.clear();
        self.penalties = PenaltyCounts::default();
        self.cost = Cost::ZERO;
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(placed: {}/{}, cost: {})",
            self.placed.len(),
            self.choices.len(),
            self.cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(i: usize) -> RequestIndex {
        RequestIndex::new(i)
    }

    #[test]
    fn test_new_state_is_empty() {
        let s = SearchState::new(3);
        assert_eq!(s.num_requests(), 3);
        assert_eq!(s.depth(), 0);
        assert!(!s.is_complete());
        assert_eq!(s.choice(r(1)), None);
        assert_eq!(s.cost(), Cost::ZERO);
    }

    #[test]
    fn test_place_and_unplace_restore_totals() {
        let mut s = SearchState::new(2);
        let p = PenaltyCounts {
            changes: 1,
            ..Default::default()
        };
        s.place(r(1), Choice::Enroll(4), p, Cost::new(1.0));
        assert!(s.is_assigned(r(1)));
        assert_eq!(s.choice(r(1)), Some(Choice::Enroll(4)));
        assert_eq!(s.placed(), &[r(1)]);

        s.place(r(0), Choice::Unassigned, p, Cost::new(101.0));
        assert!(s.is_complete());
        assert_eq!(
            s.iter_placed().collect::<Vec<_>>(),
            vec![(r(1), Choice::Enroll(4)), (r(0), Choice::Unassigned)]
        );

        assert_eq!(s.unplace_last(p, Cost::new(1.0)), Some(r(0)));
        assert!(!s.is_assigned(r(0)));
        assert_eq!(s.cost(), Cost::new(1.0));

        s.reset();
        assert_eq!(s.depth(), 0);
        assert_eq!(s.unplace_last(p, Cost::ZERO), None);
    }
}
