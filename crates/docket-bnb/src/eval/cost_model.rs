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

use crate::{
    branching::decision::Choice, candidates::CandidateCatalog, config::SearchConfig, conflict,
    query::SuggestionQuery, state::SearchState,
};
use docket_model::{
    cost::Cost,
    index::RequestIndex,
    location::DistanceMetric,
    model::SchedulingModel,
    request::{RequestKind, Student},
    suggestion::PenaltyCounts,
};

/// Scores placements and complete assignments.
///
/// Penalties split into two parts. The *static* part of a value depends on
/// the value alone: whether it changes the current enrollment, misses the
/// preferred sections, leaves the request unassigned, or carries conflicts
/// between its own sections. The *interaction* part arises between two
/// placed values: soft overlaps, distance conflicts, and sections eating
/// into a kept free time. A placement costs its static part plus its
/// interactions with every value already placed, which makes the running
/// total of a partial suggestion exact and never larger than any completion.
///
/// `Cost` is derived from the summed `PenaltyCounts` in one step, so equal
/// counts always produce bit-identical costs regardless of placement order.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    model: &'a SchedulingModel,
    student: &'a Student,
    query: &'a SuggestionQuery,
    catalog: &'a CandidateCatalog,
    config: &'a SearchConfig,
}

impl<'a> CostModel<'a> {
    #[inline]
    pub fn new(
        model: &'a SchedulingModel,
        student: &'a Student,
        query: &'a SuggestionQuery,
        catalog: &'a CandidateCatalog,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            model,
            student,
            query,
            catalog,
            config,
        }
    }

    #[inline]
    pub fn model(&self) -> &'a SchedulingModel {
        self.model
    }

    #[inline]
    pub fn student(&self) -> &'a Student {
        self.student
    }

    #[inline]
    pub fn query(&self) -> &'a SuggestionQuery {
        self.query
    }

    #[inline]
    pub fn catalog(&self) -> &'a CandidateCatalog {
        self.catalog
    }

    #[inline]
    pub fn config(&self) -> &'a SearchConfig {
        self.config
    }

    #[inline]
    fn metric(&self) -> &DistanceMetric {
        self.config.distance_metric()
    }

    /// Returns the weighted cost of `counts`.
    #[inline]
    pub fn cost(&self, counts: &PenaltyCounts) -> Cost {
        self.config.weights().cost(counts)
    }

    /// Returns the penalties `choice` incurs for `request` on its own.
    pub fn static_penalties(&self, request: RequestIndex, choice: Choice) -> PenaltyCounts {
        let mut counts = PenaltyCounts::default();
        let selected = self.query.is_selected(request);

        match (self.student.request(request).kind(), choice) {
            (RequestKind::FreeTime(_), Choice::Enroll(_)) => {}
            (RequestKind::FreeTime(_), Choice::Unassigned) => {
                // Dropping a free time changes the student's week.
                if !selected {
                    counts.changes += 1;
                }
            }
            (RequestKind::Course(course_request), Choice::Unassigned) => {
                if !course_request.is_alternative() {
                    counts.unassigned += 1;
                }
            }
            (RequestKind::Course(_), Choice::Enroll(index)) => {
                let candidate = self.catalog.candidate(request, index);
                counts += *candidate.internal_penalties();

                let preferred = self.query.preferred_sections(request);
                if !selected {
                    let kept = preferred.is_some_and(|p| {
                        p.iter()
                            .all(|&s| candidate.enrollment().contains_section(s))
                    });
                    if !kept {
                        counts.changes += 1;
                    }
                }
                if let Some(p) = preferred
                    && candidate.sections().iter().any(|s| !p.contains(s))
                {
                    counts.preference_misses += 1;
                }
            }
        }
        counts
    }

    /// Returns the penalties between two placed values, or `None` if they
    /// cannot coexist.
    pub fn interaction(
        &self,
        (ra, ca): (RequestIndex, Choice),
        (rb, cb): (RequestIndex, Choice),
    ) -> Option<PenaltyCounts> {
        let mut counts = PenaltyCounts::default();
        let (Choice::Enroll(ia), Choice::Enroll(ib)) = (ca, cb) else {
            return Some(counts);
        };

        match (
            self.student.request(ra).kind(),
            self.student.request(rb).kind(),
        ) {
            (RequestKind::FreeTime(_), RequestKind::FreeTime(_)) => {}
            (RequestKind::Course(_), RequestKind::FreeTime(ft)) => {
                for &s in self.catalog.candidate(ra, ia).sections() {
                    counts.overlap_minutes +=
                        conflict::free_time_overlap_minutes(self.model.section(s), ft);
                }
            }
            (RequestKind::FreeTime(ft), RequestKind::Course(_)) => {
                for &s in self.catalog.candidate(rb, ib).sections() {
                    counts.overlap_minutes +=
                        conflict::free_time_overlap_minutes(self.model.section(s), ft);
                }
            }
            (RequestKind::Course(_), RequestKind::Course(_)) => {
                let a = self.catalog.candidate(ra, ia).sections();
                let b = self.catalog.candidate(rb, ib).sections();
                for &sa in a {
                    let section_a = self.model.section(sa);
                    for &sb in b {
                        if sa == sb {
                            return None;
                        }
                        let section_b = self.model.section(sb);
                        if conflict::hard_time_conflict(section_a, section_b) {
                            return None;
                        }
                        counts.overlap_minutes +=
                            conflict::section_overlap_minutes(section_a, section_b);
                        if conflict::distance_conflict(section_a, section_b, self.metric()) {
                            counts.distance_conflicts += 1;
                        }
                    }
                }
            }
        }
        Some(counts)
    }

    /// Returns the penalty increment of placing `choice` for `request` on top
    /// of `state`, given the choice's precomputed static penalties, or `None`
    /// if it conflicts with a placed value.
    #[inline]
    pub fn placement(
        &self,
        state: &SearchState,
        request: RequestIndex,
        choice: Choice,
        static_penalties: &PenaltyCounts,
    ) -> Option<PenaltyCounts> {
        let mut delta = *static_penalties;
        if !choice.is_assigned() {
            return Some(delta);
        }
        for placed in state.iter_placed() {
            delta += self.interaction((request, choice), placed)?;
        }
        Some(delta)
    }

    /// Scores a complete assignment from scratch. Returns `None` if any two
    /// values conflict.
    pub fn evaluate(&self, assignment: &[(RequestIndex, Choice)]) -> Option<PenaltyCounts> {
        let mut counts = PenaltyCounts::default();
        for (i, &(request, choice)) in assignment.iter().enumerate() {
            counts += self.static_penalties(request, choice);
            for &other in &assignment[i + 1..] {
                counts += self.interaction((request, choice), other)?;
            }
        }
        Some(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostWeights;
    use docket_model::{
        index::SectionIndex,
        location::Location,
        model::ModelBuilder,
        time::TimePattern,
    };

    fn tp(days: u8, start: u16, len: u16) -> TimePattern {
        TimePattern::new(days, start, len).unwrap()
    }

    /// MATH: sections M0 (Mon 9:00), M1 (Mon 10:00, allow overlap), M2 (Mon 9:25).
    /// ART: sections A0 (Mon 9:00 @ far away), A1 (Mon 9:55 @ far away).
    struct Fixture {
        model: SchedulingModel,
        student: Student,
        config: SearchConfig,
    }

    fn fixture() -> Fixture {
        let mut b = ModelBuilder::new();
        let math = b.add_course(1, "MATH");
        let ml = b.add_subpart(math, 1, "Lec", None).unwrap();
        let m0 = b.add_section(ml, 10, "M0").unwrap();
        let m1 = b.add_section(ml, 11, "M1").unwrap();
        let m2 = b.add_section(ml, 12, "M2").unwrap();
        b.set_section_time(m0, tp(0b1, 108, 10))
            .set_section_location(m0, Location::new(0.0, 0.0));
        b.set_section_time(m1, tp(0b1, 120, 10))
            .set_section_allow_overlap(m1, true)
            .set_section_location(m1, Location::new(0.0, 0.0));
        b.set_section_time(m2, tp(0b1, 113, 10));
        let art = b.add_course(2, "ART");
        let al = b.add_subpart(art, 2, "Lec", None).unwrap();
        let a0 = b.add_section(al, 20, "A0").unwrap();
        let a1 = b.add_section(al, 21, "A1").unwrap();
        b.set_section_time(a0, tp(0b1, 108, 10))
            .set_section_location(a0, Location::new(300.0, 0.0));
        b.set_section_time(a1, tp(0b1, 119, 10))
            .set_section_location(a1, Location::new(300.0, 0.0));
        let model = b.build().unwrap();

        let mut student = Student::new(1);
        student.add_course_request(1, vec![math]).unwrap();
        student.add_course_request(2, vec![art]).unwrap();
        student.add_free_time_request(3, tp(0b1, 118, 6));
        Fixture {
            model,
            student,
            config: SearchConfig::default(),
        }
    }

    fn r(i: usize) -> RequestIndex {
        RequestIndex::new(i)
    }

    #[test]
    fn test_static_change_and_preference_terms() {
        let f = fixture();
        let catalog = CandidateCatalog::build(&f.model, &f.student, f.config.distance_metric());
        let mut query = SuggestionQuery::new(r(1));
        query.prefer_section(r(0), SectionIndex::new(0));
        let costs = CostModel::new(&f.model, &f.student, &query, &catalog, &f.config);

        // Keeping M0 is neither a change nor a miss.
        assert_eq!(
            costs.static_penalties(r(0), Choice::Enroll(0)),
            PenaltyCounts::default()
        );
        // Moving to M1 is both.
        let moved = costs.static_penalties(r(0), Choice::Enroll(1));
        assert_eq!(moved.changes, 1);
        assert_eq!(moved.preference_misses, 1);
        // Dropping a course is not a change but is unassigned.
        let dropped = costs.static_penalties(r(0), Choice::Unassigned);
        assert_eq!(dropped.changes, 0);
        assert_eq!(dropped.unassigned, 1);
        // The selected request never counts as a change; without a preferred
        // set it misses nothing.
        assert_eq!(
            costs.static_penalties(r(1), Choice::Enroll(1)),
            PenaltyCounts::default()
        );
        // A dropped free time is a change.
        assert_eq!(costs.static_penalties(r(2), Choice::Unassigned).changes, 1);
        assert_eq!(
            costs.static_penalties(r(2), Choice::Enroll(0)),
            PenaltyCounts::default()
        );
    }

    #[test]
    fn test_interaction_hard_soft_and_distance() {
        let f = fixture();
        let catalog = CandidateCatalog::build(&f.model, &f.student, f.config.distance_metric());
        let query = SuggestionQuery::new(r(0));
        let costs = CostModel::new(&f.model, &f.student, &query, &catalog, &f.config);

        // M0 and A0 meet at the same time.
        assert_eq!(
            costs.interaction((r(0), Choice::Enroll(0)), (r(1), Choice::Enroll(0))),
            None
        );
        // M1 tolerates overlaps: A1 09:55-10:45 vs M1 10:00-10:50 = 45 minutes.
        let soft = costs
            .interaction((r(0), Choice::Enroll(1)), (r(1), Choice::Enroll(1)))
            .unwrap();
        assert_eq!(soft.overlap_minutes, 45);
        assert_eq!(soft.distance_conflicts, 0);
        // M0 ends 09:50, A1 starts 09:55 three kilometers away.
        let far = costs
            .interaction((r(0), Choice::Enroll(0)), (r(1), Choice::Enroll(1)))
            .unwrap();
        assert_eq!(far.distance_conflicts, 1);
        assert_eq!(far.overlap_minutes, 0);
        // Free time 09:50-10:20 vs M1 10:00-10:50.
        let ft = costs
            .interaction((r(2), Choice::Enroll(0)), (r(0), Choice::Enroll(1)))
            .unwrap();
        assert_eq!(ft.overlap_minutes, 20);
        // Unassigned never interacts.
        assert_eq!(
            costs.interaction((r(0), Choice::Unassigned), (r(1), Choice::Enroll(0))),
            Some(PenaltyCounts::default())
        );
    }

    #[test]
    fn test_incremental_placement_matches_full_evaluation() {
        let f = fixture();
        let catalog = CandidateCatalog::build(&f.model, &f.student, f.config.distance_metric());
        let mut query = SuggestionQuery::new(r(1));
        query.prefer_section(r(0), SectionIndex::new(1));
        let costs = CostModel::new(&f.model, &f.student, &query, &catalog, &f.config);

        let assignment = [
            (r(2), Choice::Enroll(0)),
            (r(0), Choice::Enroll(1)),
            (r(1), Choice::Enroll(1)),
        ];
        let mut state = SearchState::new(3);
        for &(request, choice) in &assignment {
            let stat = costs.static_penalties(request, choice);
            let delta = costs.placement(&state, request, choice, &stat).unwrap();
            let total = *state.penalties() + delta;
            state.place(request, choice, total, costs.cost(&total));
        }
        let full = costs.evaluate(&assignment).unwrap();
        assert_eq!(*state.penalties(), full);
        assert_eq!(state.cost(), costs.cost(&full));
        // Free time vs M1 (20), free time vs A1 (25), A1 vs M1 (45).
        assert_eq!(full.overlap_minutes, 90);
    }

    #[test]
    fn test_cost_uses_configured_weights() {
        let f = fixture();
        let catalog = CandidateCatalog::build(&f.model, &f.student, f.config.distance_metric());
        let query = SuggestionQuery::new(r(0));
        let config = SearchConfig::builder()
            .weights(CostWeights {
                unassigned: 7.0,
                ..Default::default()
            })
            .build()
            .unwrap();
        let costs = CostModel::new(&f.model, &f.student, &query, &catalog, &config);
        let counts = costs.static_penalties(r(1), Choice::Unassigned);
        assert_eq!(costs.cost(&counts), Cost::new(7.0));
    }
}
