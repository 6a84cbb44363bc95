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

//! The bounded, ordered set of best suggestions found so far.

use docket_model::{cost::Cost, suggestion::Suggestion};
use std::cmp::Ordering;

/// Result of offering a suggestion to the frontier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The suggestion was inserted.
    Admitted,
    /// The frontier is full and the suggestion does not rank before its
    /// worst entry.
    Rejected,
}

impl Admission {
    #[inline]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

impl std::fmt::Display for Admission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Admission::Admitted => write!(f, "Admitted"),
            Admission::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Holds at most `capacity` suggestions sorted by `Suggestion::rank_cmp`.
///
/// Entries are kept in a sorted vector; an admission inserts at the ranked
/// position and truncates the tail. Since ranking is a total order over
/// cost and tie-break key, the content after any sequence of offers is the
/// best `capacity` suggestions offered, whatever the order of the offers.
#[derive(Clone, Debug)]
pub struct SuggestionFrontier {
    capacity: usize,
    entries: Vec<Suggestion>,
}

impl SuggestionFrontier {
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity.min(64)),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Returns the cost of the worst admitted suggestion, or
    /// `Cost::INFINITY` while the frontier is not full.
    #[inline]
    pub fn worst_admitted_cost(&self) -> Cost {
        if !self.is_full() {
            return Cost::INFINITY;
        }
        self.entries.last().map_or(Cost::INFINITY, Suggestion::cost)
    }

    /// Returns `true` if offering `suggestion` would admit it.
    #[inline]
    pub fn admits(&self, suggestion: &Suggestion) -> bool {
        if self.capacity == 0 {
            return false;
        }
        match self.entries.last() {
            Some(worst) if self.is_full() => suggestion.rank_cmp(worst) == Ordering::Less,
            _ => true,
        }
    }

    /// Offers `suggestion` to the frontier.
    pub fn offer(&mut self, suggestion: Suggestion) -> Admission {
        if !self.admits(&suggestion) {
            return Admission::Rejected;
        }

        let position = self
            .entries
            .partition_point(|e| e.rank_cmp(&suggestion) != Ordering::Greater);
        self.entries.insert(position, suggestion);
        self.entries.truncate(self.capacity);
        Admission::Admitted
    }

    /// Returns the admitted suggestions, best first.
    #[inline]
    pub fn as_slice(&self) -> &[Suggestion] {
        &self.entries
    }

    /// Consumes the frontier and returns its suggestions, best first.
    #[inline]
    pub fn into_sorted_vec(self) -> Vec<Suggestion> {
        self.entries
    }
}

impl std::fmt::Display for SuggestionFrontier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuggestionFrontier(len: {}, capacity: {}, worst: {})",
            self.entries.len(),
            self.capacity,
            self.worst_admitted_cost()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_model::{
        enrollment::Enrollment,
        index::{CourseIndex, RequestIndex, SectionIndex},
        model::{ModelBuilder, SchedulingModel},
        suggestion::PenaltyCounts,
    };
    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
    use smallvec::smallvec;

    fn model() -> SchedulingModel {
        let mut b = ModelBuilder::new();
        let c = b.add_course(1, "C");
        let sp = b.add_subpart(c, 1, "Lec", None).unwrap();
        for i in 0..10 {
            b.add_section(sp, 100 + i, format!("{}", i)).unwrap();
        }
        b.build().unwrap()
    }

    fn suggestion(model: &SchedulingModel, section: usize, cost: f64) -> Suggestion {
        Suggestion::new(
            model,
            Cost::new(cost),
            PenaltyCounts::default(),
            vec![Enrollment::course(
                RequestIndex::new(0),
                CourseIndex::new(0),
                smallvec![SectionIndex::new(section)],
            )],
        )
    }

    fn costs(f: &SuggestionFrontier) -> Vec<f64> {
        f.as_slice().iter().map(|s| s.cost().value()).collect()
    }

    #[test]
    fn test_worst_cost_is_infinite_until_full() {
        let m = model();
        let mut f = SuggestionFrontier::new(2);
        assert_eq!(f.worst_admitted_cost(), Cost::INFINITY);
        assert!(f.offer(suggestion(&m, 0, 3.0)).is_admitted());
        assert_eq!(f.worst_admitted_cost(), Cost::INFINITY);
        assert!(f.offer(suggestion(&m, 1, 1.0)).is_admitted());
        assert_eq!(f.worst_admitted_cost(), Cost::new(3.0));
        assert!(f.is_full());
    }

    #[test]
    fn test_evicts_worst_and_rejects_no_better() {
        let m = model();
        let mut f = SuggestionFrontier::new(2);
        f.offer(suggestion(&m, 0, 3.0));
        f.offer(suggestion(&m, 1, 1.0));
        assert_eq!(f.offer(suggestion(&m, 2, 2.0)), Admission::Admitted);
        assert_eq!(costs(&f), vec![1.0, 2.0]);
        assert!(!f.admits(&suggestion(&m, 3, 5.0)));
        assert_eq!(f.offer(suggestion(&m, 3, 5.0)), Admission::Rejected);
        // Equal cost, larger tie-break key than the worst entry.
        assert_eq!(f.offer(suggestion(&m, 4, 2.0)), Admission::Rejected);
        // Equal cost, smaller tie-break key.
        assert_eq!(f.offer(suggestion(&m, 0, 2.0)), Admission::Admitted);
        let sections: Vec<_> = f
            .as_slice()
            .iter()
            .map(|s| s.enrollments()[0].sections()[0].get())
            .collect();
        assert_eq!(sections, vec![1, 0]);
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let m = model();
        let mut f = SuggestionFrontier::new(0);
        assert_eq!(f.offer(suggestion(&m, 0, 0.0)), Admission::Rejected);
        assert!(f.is_empty());
        assert!(f.is_full());
    }

    #[test]
    fn test_content_is_independent_of_offer_order() {
        let m = model();
        let items: Vec<(usize, f64)> = (0..10).map(|i| (i, (i % 4) as f64)).collect();
        let mut reference: Option<Vec<Suggestion>> = None;
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut shuffled = items.clone();
            shuffled.shuffle(&mut rng);
            let mut f = SuggestionFrontier::new(4);
            for (section, cost) in shuffled {
                f.offer(suggestion(&m, section, cost));
            }
            let out = f.into_sorted_vec();
            match &reference {
                None => reference = Some(out),
                Some(r) => assert_eq!(&out, r),
            }
        }
        let r = reference.unwrap();
        let got: Vec<_> = r.iter().map(|s| s.cost().value()).collect();
        assert_eq!(got, vec![0.0, 0.0, 0.0, 1.0]);
    }
}
