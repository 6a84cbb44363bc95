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

//! The static shape of the search tree.
//!
//! Requests are visited in a fixed order: required requests first, then the
//! selected request, then the rest, each group in request order. For every
//! level the plan holds the admissible values of its request together with
//! their static penalties, and the sum of the cheapest static costs of all
//! deeper levels, which is the optimistic completion bound of the engine.
//!
//! Admissible values per request:
//! - **required course request**: enrollments containing every required
//!   section; never unassigned.
//! - **selected course request**: enrollments avoiding the selected section,
//!   or, without one, enrollments that differ from the current one.
//!   Unassigned only when dropping is enabled and the request is enrolled.
//! - **other course requests**: every enrollment, then unassigned.
//! - **free times**: kept or dropped; the selected one is dropped, a
//!   required one is kept.
//!
//! Enrollments into sections without a free seat are removed unless the
//! configuration allows over-limit enrollments. Required sections are exempt
//! for every request except the selected one.

use crate::{
    branching::decision::Choice, candidates::Candidate, conflict, eval::cost_model::CostModel,
    governor::TimeoutGovernor,
};
use docket_model::{
    cost::Cost,
    index::RequestIndex,
    request::RequestKind,
    suggestion::PenaltyCounts,
};

/// A value admissible for a request, with its static penalties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedChoice {
    choice: Choice,
    static_penalties: PenaltyCounts,
    static_cost: Cost,
}

impl PlannedChoice {
    #[inline]
    pub fn choice(&self) -> Choice {
        self.choice
    }

    #[inline]
    pub fn static_penalties(&self) -> &PenaltyCounts {
        &self.static_penalties
    }

    #[inline]
    pub fn static_cost(&self) -> Cost {
        self.static_cost
    }
}

/// One level of the search tree.
#[derive(Clone, Debug)]
pub struct RequestPlan {
    request: RequestIndex,
    choices: Vec<PlannedChoice>,
}

impl RequestPlan {
    #[inline]
    pub fn request(&self) -> RequestIndex {
        self.request
    }

    /// Returns the admissible values, enrollments in catalog order first and
    /// unassigned last.
    #[inline]
    pub fn choices(&self) -> &[PlannedChoice] {
        &self.choices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct SearchPlan {
    levels: Vec<RequestPlan>,
    remaining_bound: Vec<Cost>,
}

impl Default for SearchPlan {
    fn default() -> Self {
        Self {
            levels: Vec::new(),
            remaining_bound: vec![Cost::ZERO],
        }
    }
}

impl SearchPlan {
    /// Builds the plan of one suggestion call.
    pub fn build(costs: &CostModel<'_>) -> Self {
        Self::build_within(costs, &mut TimeoutGovernor::unbounded()).unwrap_or_default()
    }

    /// Builds the plan of one suggestion call, or returns `None` if
    /// `governor` expires while the static penalties are being scored.
    pub fn build_within(costs: &CostModel<'_>, governor: &mut TimeoutGovernor) -> Option<Self> {
        let student = costs.student();
        let query = costs.query();

        let n = student.num_requests();
        let mut order: Vec<RequestIndex> = Vec::with_capacity(n);
        order.extend(RequestIndex::range(n).filter(|&r| query.is_required(r)));
        order.push(query.selected_request());
        order.extend(
            RequestIndex::range(n).filter(|&r| !query.is_required(r) && !query.is_selected(r)),
        );

        let mut levels: Vec<RequestPlan> = Vec::with_capacity(order.len());
        for request in order {
            let admissible = admissible_choices(costs, request);
            let mut choices = Vec::with_capacity(admissible.len());
            for choice in admissible {
                if governor.poll() {
                    return None;
                }
                let static_penalties = costs.static_penalties(request, choice);
                choices.push(PlannedChoice {
                    choice,
                    static_penalties,
                    static_cost: costs.cost(&static_penalties),
                });
            }
            levels.push(RequestPlan { request, choices });
        }

        let mut remaining_bound = vec![Cost::ZERO; levels.len() + 1];
        for depth in (0..levels.len()).rev() {
            let cheapest = levels[depth]
                .choices
                .iter()
                .map(PlannedChoice::static_cost)
                .min()
                .unwrap_or(Cost::INFINITY);
            remaining_bound[depth] = remaining_bound[depth + 1] + cheapest;
        }

        Some(Self {
            levels,
            remaining_bound,
        })
    }

    /// Returns the number of levels, equal to the number of requests.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the level at `depth`.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is not within `0..len()`.
    #[inline]
    pub fn level(&self, depth: usize) -> &RequestPlan {
        debug_assert!(
            depth < self.levels.len(),
            "called `SearchPlan::level` with depth out of bounds: the len is {} but the index is {}",
            self.levels.len(),
            depth
        );
        &self.levels[depth]
    }

    #[inline]
    pub fn levels(&self) -> &[RequestPlan] {
        &self.levels
    }

    /// Returns the visiting order of the requests.
    #[inline]
    pub fn order(&self) -> impl Iterator<Item = RequestIndex> + '_ {
        self.levels.iter().map(RequestPlan::request)
    }

    /// Returns a lower bound on the cost added by levels `depth..`.
    /// Infinite if some remaining level has no admissible value.
    #[inline]
    pub fn remaining_bound(&self, depth: usize) -> Cost {
        self.remaining_bound[depth]
    }

    /// Returns `true` if some request has no admissible value at all.
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        self.levels.iter().any(RequestPlan::is_empty)
    }

    /// Returns the largest number of values of any level.
    #[inline]
    pub fn max_branching(&self) -> usize {
        self.levels.iter().map(RequestPlan::len).max().unwrap_or(0)
    }
}

impl std::fmt::Display for SearchPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchPlan(")?;
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", level.request, level.choices.len())?;
        }
        write!(f, ")")
    }
}

fn admissible_choices(costs: &CostModel<'_>, request: RequestIndex) -> Vec<Choice> {
    let query = costs.query();
    let selected = query.is_selected(request);
    let required = query.is_required(request);

    match costs.student().request(request).kind() {
        RequestKind::FreeTime(_) => {
            if selected {
                vec![Choice::Unassigned]
            } else if required {
                vec![Choice::Enroll(0)]
            } else {
                vec![Choice::Enroll(0), Choice::Unassigned]
            }
        }
        RequestKind::Course(_) => {
            let preferred = query.preferred_sections(request);
            let required_sections = if selected {
                None
            } else {
                query.required_sections(request)
            };

            let keep = |candidate: &Candidate| -> bool {
                let contains = |s| candidate.enrollment().contains_section(s);
                let shape_ok = if selected {
                    match query.selected_section() {
                        Some(s) => !contains(s),
                        None => !preferred.is_some_and(|p| p.iter().all(|&s| contains(s))),
                    }
                } else {
                    required_sections.is_none_or(|r| r.iter().all(|&s| contains(s)))
                };
                shape_ok
                    && candidate.sections().iter().all(|&s| {
                        required_sections.is_some_and(|r| r.contains(&s))
                            || conflict::capacity_ok(
                                costs.model().section(s),
                                costs.model().section(s).enrolled(),
                                costs.config().allow_over_limit(),
                            )
                    })
            };

            let mut choices: Vec<Choice> = costs
                .catalog()
                .candidates(request)
                .iter()
                .enumerate()
                .filter(|(_, c)| keep(*c))
                .map(|(i, _)| Choice::Enroll(i as u32))
                .collect();

            let may_drop = if selected {
                costs.config().allow_drop_selected() && preferred.is_some()
            } else {
                !required
            };
            if may_drop {
                choices.push(Choice::Unassigned);
            }
            choices
        }
    }
}
