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

use crate::branching::decision::Decision;

/// A frame-structured LIFO stack of pending decisions.
///
/// All enqueued decisions live in one vector; `frames` records where each
/// depth begins. Popping a frame truncates the vector back to that index,
/// discarding the siblings that were never explored.
#[derive(Clone, Debug, Default)]
pub struct SearchStack {
    entries: Vec<Decision>,
    frames: Vec<usize>,
}

impl SearchStack {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a stack sized for `num_requests` levels of at most
    /// `max_branching` decisions each.
    #[inline]
    pub fn preallocated(num_requests: usize, max_branching: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_requests.saturating_mul(max_branching)),
            frames: Vec::with_capacity(num_requests.saturating_add(1)),
        }
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_requests: usize, max_branching: usize) {
        let entry_capacity = num_requests.saturating_mul(max_branching);
        let frame_capacity = num_requests.saturating_add(1);
        if self.entries.capacity() < entry_capacity {
            self.entries
                .reserve(entry_capacity - self.entries.capacity());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.capacity());
        }
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current search depth in frames.
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
        self.frames.push(self.entries.len());
    }

    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    #[inline]
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Decision>,
    {
        self.entries.extend(iter);
    }

    /// Pops the next decision to explore.
    #[inline]
    pub fn pop(&mut self) -> Option<Decision> {
        match self.frames.last() {
            Some(&start) if self.entries.len() > start => self.entries.pop(),
            _ => None,
        }
    }

    /// Clears all entries and frames but keeps the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<Decision>()
            + self.frames.capacity() * std::mem::size_of::<usize>()
    }
}

impl std::fmt::Display for SearchStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::decision::Choice;
    use docket_model::{cost::Cost, index::RequestIndex, suggestion::PenaltyCounts};

    fn d(request: usize, candidate: u32) -> Decision {
        Decision::new(
            RequestIndex::new(request),
            Choice::Enroll(candidate),
            PenaltyCounts::default(),
            Cost::ZERO,
        )
    }

    #[test]
    fn test_new_stack_is_empty() {
        let s = SearchStack::new();
        assert!(s.is_empty());
        assert!(s.is_current_level_empty());
        assert_eq!(format!("{}", s), "SearchStack(entries: 0, frames: 0)");
        assert!(SearchStack::preallocated(4, 3).allocated_memory_bytes() > 0);
    }

    #[test]
    fn test_pop_is_lifo_and_scoped_to_frame() {
        let mut s = SearchStack::new();
        s.push_frame();
        s.extend([d(0, 0), d(0, 1)]);
        s.push_frame();
        assert!(s.is_current_level_empty());
        assert_eq!(s.pop(), None);

        s.extend([d(1, 7)]);
        assert!(!s.is_current_level_empty());
        assert_eq!(s.pop(), Some(d(1, 7)));
        assert_eq!(s.pop(), None);

        s.pop_frame();
        assert_eq!(s.pop(), Some(d(0, 1)));
        assert_eq!(s.num_entries(), 1);
    }

    #[test]
    fn test_pop_frame_discards_unexplored_siblings() {
        let mut s = SearchStack::new();
        s.push_frame();
        s.extend([d(0, 0)]);
        s.push_frame();
        s.extend([d(1, 0), d(1, 1), d(1, 2)]);
        assert_eq!(s.num_entries(), 4);
        assert_eq!(s.pop_frame(), Some(()));
        assert_eq!(s.num_entries(), 1);
        assert_eq!(s.depth(), 1);
        s.reset();
        assert!(s.is_empty());
        assert_eq!(s.pop_frame(), None);
    }

    #[test]
    fn test_ensure_capacity_is_monotonic() {
        let mut s = SearchStack::preallocated(1, 1);
        s.ensure_capacity(6, 5);
        let bytes = s.allocated_memory_bytes();
        s.ensure_capacity(1, 1);
        assert_eq!(s.allocated_memory_bytes(), bytes);
    }
}
