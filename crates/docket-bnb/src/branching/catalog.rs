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

/// Explores the placements of a level in catalog order, ignoring cost.
#[derive(Debug, Clone, Default)]
pub struct CatalogOrderBuilder {
    decisions: Vec<Decision>,
}

impl CatalogOrderBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            decisions: Vec::new(),
        }
    }
}

impl DecisionBuilder for CatalogOrderBuilder {
    type DecisionIterator<'a>
        = CatalogOrderIter<'a>
    where
        Self: 'a;

    fn name(&self) -> &str {
        "CatalogOrderBuilder"
    }

    fn next_decisions<'a>(
        &'a mut self,
        costs: &CostModel<'_>,
        plan: &SearchPlan,
        state: &SearchState,
    ) -> Self::DecisionIterator<'a> {
        self.decisions.clear();
        if state.depth() < plan.len() {
            let level = plan.level(state.depth());
            self.decisions
                .extend(level.choices().iter().filter_map(|planned| {
                    Decision::try_new(
                        costs,
                        state,
                        level.request(),
                        planned.choice(),
                        planned.static_penalties(),
                    )
                }));
        }
        CatalogOrderIter {
            iter: self.decisions.iter().rev(),
        }
    }
}

pub struct CatalogOrderIter<'a> {
    iter: std::iter::Rev<std::slice::Iter<'a, Decision>>,
}

impl Iterator for CatalogOrderIter<'_> {
    type Item = Decision;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().copied()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl FusedIterator for CatalogOrderIter<'_> {}
