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
    branching::decision::{Decision, DecisionBuilder},
    eval::cost_model::CostModel,
    plan::SearchPlan,
    state::SearchState,
};
use std::iter::FusedIterator;

/// Explores the placements of a level in order of increasing resulting
/// cost, so the engine reaches cheap leaves first and the frontier bound
/// tightens early. Ties keep the catalog order of the plan.
#[derive(Debug, Clone, Default)]
pub struct CheapestFirstBuilder {
    candidates: Vec<(usize, Decision)>,
}

impl CheapestFirstBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(size: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(size),
        }
    }
}

impl DecisionBuilder for CheapestFirstBuilder {
    type DecisionIterator<'a>
        = CheapestFirstIter<'a>
    where
        Self: 'a;

    fn name(&self) -> &str {
        "CheapestFirstBuilder"
    }

    fn next_decisions<'a>(
        &'a mut self,
        costs: &CostModel<'_>,
        plan: &SearchPlan,
        state: &SearchState,
    ) -> Self::DecisionIterator<'a> {
        self.candidates.clear();

        if state.depth() < plan.len() {
            let level = plan.level(state.depth());
            for (position, planned) in level.choices().iter().enumerate() {
                if let Some(decision) = Decision::try_new(
                    costs,
                    state,
                    level.request(),
                    planned.choice(),
                    planned.static_penalties(),
                ) {
                    self.candidates.push((position, decision));
                }
            }
        }

        // Most expensive first: the engine pops from the back.
        self.candidates.sort_unstable_by(|(pa, a), (pb, b)| {
            b.cost().cmp(&a.cost()).then_with(|| pb.cmp(pa))
        });

        CheapestFirstIter {
            iter: self.candidates.iter(),
        }
    }
}

pub struct CheapestFirstIter<'a> {
    iter: std::slice::Iter<'a, (usize, Decision)>,
}

impl Iterator for CheapestFirstIter<'_> {
    type Item = Decision;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, d)| *d)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl FusedIterator for CheapestFirstIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::decision::Choice, candidates::CandidateCatalog, config::SearchConfig,
        query::SuggestionQuery,
    };
    use docket_model::{
        index::RequestIndex,
        model::ModelBuilder,
        request::Student,
        time::TimePattern,
    };

    #[test]
    fn test_yields_most_expensive_first_and_skips_conflicts() {
        let mut b = ModelBuilder::new();
        let c = b.add_course(1, "C");
        let sp = b.add_subpart(c, 1, "Lec", None).unwrap();
        let s0 = b.add_section(sp, 1, "S0").unwrap();
        let s1 = b.add_section(sp, 2, "S1").unwrap();
        let s2 = b.add_section(sp, 3, "S2").unwrap();
        b.set_section_time(s0, TimePattern::new(0b1, 100, 10).unwrap());
        b.set_section_time(s1, TimePattern::new(0b1, 200, 10).unwrap());
        b.set_section_time(s2, TimePattern::new(0b1, 105, 10).unwrap())
            .set_section_allow_overlap(s2, true);
        let d = b.add_course(2, "D");
        let dp = b.add_subpart(d, 2, "Lec", None).unwrap();
        let t0 = b.add_section(dp, 4, "T0").unwrap();
        b.set_section_time(t0, TimePattern::new(0b1, 100, 10).unwrap());
        let model = b.build().unwrap();

        let mut student = Student::new(1);
        student.add_course_request(1, vec![d]).unwrap();
        student.add_course_request(2, vec![c]).unwrap();

        let mut query = SuggestionQuery::new(RequestIndex::new(1));
        query.require_section(RequestIndex::new(0), t0);
        let config = SearchConfig::default();
        let catalog = CandidateCatalog::build(&model, &student, config.distance_metric());
        let costs = CostModel::new(&model, &student, &query, &catalog, &config);
        let plan = SearchPlan::build(&costs);

        let mut state = SearchState::new(2);
        let mut builder = CheapestFirstBuilder::new();
        let root: Vec<_> = builder.next_decisions(&costs, &plan, &state).collect();
        assert_eq!(root.len(), 1);
        let first = root[0];
        state.place(
            first.request(),
            first.choice(),
            *first.penalties(),
            first.cost(),
        );

        // S0 clashes with the required T0; S2 overlaps it softly for 25 minutes.
        let decisions: Vec<_> = builder.next_decisions(&costs, &plan, &state).collect();
        let choices: Vec<_> = decisions.iter().map(|d| d.choice()).collect();
        assert_eq!(choices, vec![Choice::Enroll(2), Choice::Enroll(1)]);
        assert_eq!(decisions[0].penalties().overlap_minutes, 25);
        assert!(decisions[0].cost() > decisions[1].cost());
        assert_eq!(builder.name(), "CheapestFirstBuilder");
    }
}
