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

use crate::{cost::Cost, enrollment::Enrollment, index::RequestIndex, model::SchedulingModel};
use std::{
    cmp::Ordering,
    ops::{Add, AddAssign},
};

/// Raw penalty counts behind a suggestion's cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PenaltyCounts {
    /// Requests whose enrollment differs from the current one.
    pub changes: u32,
    /// Requests enrolled outside their preferred sections.
    pub preference_misses: u32,
    /// Pairs of consecutive meetings too far apart.
    pub distance_conflicts: u32,
    /// Tolerated overlapping minutes per week.
    pub overlap_minutes: u32,
    /// Requests left without an enrollment.
    pub unassigned: u32,
}

impl std::fmt::Display for PenaltyCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "changes: {}, preference misses: {}, distance conflicts: {}, overlap: {}min, unassigned: {}",
            self.changes,
            self.preference_misses,
            self.distance_conflicts,
            self.overlap_minutes,
            self.unassigned
        )
    }
}

impl AddAssign for PenaltyCounts {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.changes += rhs.changes;
        self.preference_misses += rhs.preference_misses;
        self.distance_conflicts += rhs.distance_conflicts;
        self.overlap_minutes += rhs.overlap_minutes;
        self.unassigned += rhs.unassigned;
    }
}

impl Add for PenaltyCounts {
    type Output = PenaltyCounts;

    #[inline]
    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

/// A complete alternative schedule for one student.
///
/// Holds one enrollment per assigned request in ascending request order,
/// the cost of the whole assignment, and a tie-break key derived from the
/// external identifiers of the chosen courses and sections. Suggestions are
/// ranked by cost first and by the key second, so ranking never depends on
/// the order in which the search discovered them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    cost: Cost,
    penalties: PenaltyCounts,
    enrollments: Vec<Enrollment>,
    key: Vec<u64>,
}

const KEY_FREE_TIME: u64 = 0;
const KEY_COURSE: u64 = 1;

impl Suggestion {
    /// Creates a suggestion, sorting the enrollments by request.
    pub fn new(
        model: &SchedulingModel,
        cost: Cost,
        penalties: PenaltyCounts,
        mut enrollments: Vec<Enrollment>,
    ) -> Self {
        enrollments.sort_by_key(Enrollment::request);

        let mut key = Vec::with_capacity(enrollments.len() * 4);
        for e in &enrollments {
            key.push(e.request().get() as u64);
            match e {
                Enrollment::FreeTime { .. } => key.push(KEY_FREE_TIME),
                Enrollment::Course {
                    course, sections, ..
                } => {
                    key.push(KEY_COURSE);
                    key.push(model.course(*course).id());
                    key.push(sections.len() as u64);
                    key.extend(sections.iter().map(|&s| model.section(s).id()));
                }
            }
        }

        Self {
            cost,
            penalties,
            enrollments,
            key,
        }
    }

    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline]
    pub fn penalties(&self) -> &PenaltyCounts {
        &self.penalties
    }

    /// Returns the enrollments in ascending request order.
    #[inline]
    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    /// Returns the enrollment of `request`, or `None` if it is unassigned.
    pub fn enrollment(&self, request: RequestIndex) -> Option<&Enrollment> {
        self.enrollments
            .binary_search_by_key(&request, Enrollment::request)
            .ok()
            .map(|i| &self.enrollments[i])
    }

    #[inline]
    pub fn is_assigned(&self, request: RequestIndex) -> bool {
        self.enrollment(request).is_some()
    }

    /// Returns the deterministic tie-break key.
    #[inline]
    pub fn tie_break_key(&self) -> &[u64] {
        &self.key
    }

    /// Orders by ascending cost, then by tie-break key.
    #[inline]
    pub fn rank_cmp(&self, other: &Suggestion) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Suggestion(cost: {}, ", self.cost)?;
        for (i, e) in self.enrollments.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        index::{CourseIndex, SectionIndex},
        model::ModelBuilder,
    };
    use smallvec::smallvec;

    fn two_section_model() -> SchedulingModel {
        let mut b = ModelBuilder::new();
        let c = b.add_course(500, "CS101");
        let sp = b.add_subpart(c, 1, "Lec", None).unwrap();
        b.add_section(sp, 900, "1").unwrap();
        b.add_section(sp, 800, "2").unwrap();
        b.build().unwrap()
    }

    fn course(req: usize, section: usize) -> Enrollment {
        Enrollment::course(
            RequestIndex::new(req),
            CourseIndex::new(0),
            smallvec![SectionIndex::new(section)],
        )
    }

    #[test]
    fn test_penalty_counts_add_fieldwise() {
        let a = PenaltyCounts {
            changes: 1,
            overlap_minutes: 15,
            ..Default::default()
        };
        let b = PenaltyCounts {
            changes: 2,
            unassigned: 1,
            ..Default::default()
        };
        let sum = a + b;
        assert_eq!(sum.changes, 3);
        assert_eq!(sum.overlap_minutes, 15);
        assert_eq!(sum.unassigned, 1);
        assert_eq!(sum.distance_conflicts, 0);
    }

    #[test]
    fn test_enrollments_sorted_and_lookup() {
        let model = two_section_model();
        let s = Suggestion::new(
            &model,
            Cost::ZERO,
            PenaltyCounts::default(),
            vec![course(2, 0), Enrollment::free_time(RequestIndex::new(0))],
        );
        assert_eq!(s.enrollments()[0].request(), RequestIndex::new(0));
        assert!(s.is_assigned(RequestIndex::new(2)));
        assert!(!s.is_assigned(RequestIndex::new(1)));
        assert_eq!(s.enrollment(RequestIndex::new(2)), Some(&course(2, 0)));
    }

    #[test]
    fn test_rank_breaks_ties_by_external_section_id() {
        let model = two_section_model();
        let a = Suggestion::new(&model, Cost::new(1.0), PenaltyCounts::default(), vec![course(0, 0)]);
        let b = Suggestion::new(&model, Cost::new(1.0), PenaltyCounts::default(), vec![course(0, 1)]);
        // Section 1 has external id 800 < 900.
        assert_eq!(b.rank_cmp(&a), Ordering::Less);

        let c = Suggestion::new(&model, Cost::new(0.5), PenaltyCounts::default(), vec![course(0, 0)]);
        assert_eq!(c.rank_cmp(&b), Ordering::Less);
        assert_eq!(a.rank_cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_unassigned_request_changes_key() {
        let model = two_section_model();
        let a = Suggestion::new(&model, Cost::ZERO, PenaltyCounts::default(), vec![course(1, 0)]);
        let b = Suggestion::new(
            &model,
            Cost::ZERO,
            PenaltyCounts::default(),
            vec![course(0, 0), course(1, 0)],
        );
        assert_ne!(a.tie_break_key(), b.tie_break_key());
    }
}
