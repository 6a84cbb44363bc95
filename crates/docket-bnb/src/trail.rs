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

use crate::{branching::decision::Choice, state::SearchState};
use docket_model::{cost::Cost, index::RequestIndex, suggestion::PenaltyCounts};

/// A record of one placement, holding the totals that were current before
/// it so the placement can be undone exactly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrailEntry {
    old_cost: Cost,
    old_penalties: PenaltyCounts,
    request: RequestIndex,
}

impl TrailEntry {
    #[inline]
    pub fn old_cost(&self) -> Cost {
        self.old_cost
    }

    #[inline]
    pub fn old_penalties(&self) -> &PenaltyCounts {
        &self.old_penalties
    }

    #[inline]
    pub fn request(&self) -> RequestIndex {
        self.request
    }
}

impl std::fmt::Display for TrailEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(request: {}, old_cost: {})",
            self.request, self.old_cost
        )
    }
}

/// Marks where a decision level begins on the trail.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameEntry {
    entry_start_index: usize,
}

impl FrameEntry {
    #[inline(always)]
    pub fn new(entry_start_index: usize) -> Self {
        Self { entry_start_index }
    }

    #[inline]
    pub fn entry_start_index(&self) -> usize {
        self.entry_start_index
    }
}

/// A linear undo log with frame markers.
///
/// Usage per node: `push_frame` before descending, `apply_assignment` for the
/// decision taken, `backtrack` to restore the state to the start of the frame.
#[derive(Debug, Clone, Default)]
pub struct SearchTrail {
    entries: Vec<TrailEntry>,
    frames: Vec<FrameEntry>,
}

impl SearchTrail {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a trail with room for `num_requests` placements.
    #[inline]
    pub fn preallocated(num_requests: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_requests),
            frames: Vec::with_capacity(num_requests + 1),
        }
    }

    pub fn ensure_capacity(&mut self, num_requests: usize) {
        if self.entries.capacity() < num_requests {
            self.entries
                .reserve(num_requests - self.entries.capacity());
        }
        if self.frames.capacity() < num_requests + 1 {
            self.frames
                .reserve((num_requests + 1) - self.frames.capacity());
        }
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(FrameEntry::new(self.entries.len()));
    }

    /// Places `request` into the state and records how to undo it.
    pub fn apply_assignment(
        &mut self,
        state: &mut SearchState,
        request: RequestIndex,
        choice: Choice,
        new_penalties: PenaltyCounts,
        new_cost: Cost,
    ) {
        debug_assert!(
            request.get() < state.num_requests(),
            "called `SearchTrail::apply_assignment` with request index out of bounds: the len is {} but the index is {}",
            state.num_requests(),
            request.get()
        );

        self.entries.push(TrailEntry {
            old_cost: state.cost(),
            old_penalties: *state.penalties(),
            request,
        });
        state.place(request, choice, new_penalties, new_cost);
    }

    /// Undoes every placement of the current frame and pops it.
    /// Returns `false` if there was no frame.
    pub fn backtrack(&mut self, state: &mut SearchState) -> bool {
        let Some(frame) = self.frames.pop() else {
            return false;
        };
        while self.entries.len() > frame.entry_start_index() {
            if let Some(entry) = self.entries.pop() {
                let removed = state.unplace_last(entry.old_penalties, entry.old_cost);
                debug_assert_eq!(
                    removed,
                    Some(entry.request),
                    "called `SearchTrail::backtrack` on a state that was modified outside the trail"
                );
            }
        }
        true
    }

    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<TrailEntry>()
            + self.frames.capacity() * std::mem::size_of::<FrameEntry>()
    }
}

impl std::fmt::Display for SearchTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(changes: u32) -> PenaltyCounts {
        PenaltyCounts {
            changes,
            ..Default::default()
        }
    }

    #[test]
    fn test_backtrack_restores_previous_frame() {
        let mut state = SearchState::new(3);
        let mut trail = SearchTrail::preallocated(3);

        trail.push_frame();
        trail.apply_assignment(
            &mut state,
            RequestIndex::new(2),
            Choice::Enroll(0),
            counts(1),
            Cost::new(1.0),
        );
        trail.push_frame();
        trail.apply_assignment(
            &mut state,
            RequestIndex::new(0),
            Choice::Unassigned,
            counts(1),
            Cost::new(101.0),
        );
        assert_eq!(state.depth(), 2);
        assert_eq!(trail.depth(), 2);

        assert!(trail.backtrack(&mut state));
        assert_eq!(state.depth(), 1);
        assert_eq!(state.cost(), Cost::new(1.0));
        assert!(!state.is_assigned(RequestIndex::new(0)));

        assert!(trail.backtrack(&mut state));
        assert_eq!(state.depth(), 0);
        assert_eq!(state.cost(), Cost::ZERO);
        assert_eq!(*state.penalties(), PenaltyCounts::default());
        assert!(!trail.backtrack(&mut state));
    }

    #[test]
    fn test_empty_frame_backtrack_is_a_no_op() {
        let mut state = SearchState::new(1);
        let mut trail = SearchTrail::new();
        trail.push_frame();
        assert!(trail.backtrack(&mut state));
        assert_eq!(trail.num_entries(), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_ensure_capacity_and_reset() {
        let mut trail = SearchTrail::new();
        trail.ensure_capacity(8);
        let bytes = trail.allocated_memory_bytes();
        assert!(bytes > 0);
        trail.ensure_capacity(2);
        assert_eq!(trail.allocated_memory_bytes(), bytes);
        trail.push_frame();
        trail.reset();
        assert_eq!(trail.depth(), 0);
        assert_eq!(format!("{}", trail), "SearchTrail(entries: 0, frames: 0)");
    }
}
