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

//! Branch-and-bound search for schedule change suggestions.
//!
//! `SuggestionSolver` walks the requests of one student in the order fixed by
//! the `SearchPlan`, placing one value per level. Values that hard-conflict
//! with the placed ones never reach the stack; the rest are kept as long as
//! their optimistic completion can still enter the bounded frontier. Every
//! leaf is a complete suggestion offered to the frontier.
//!
//! The solver owns the reusable trail and decision stack, so repeated calls
//! do not reallocate. Each call runs a private search session holding the
//! per-call state, statistics, frontier and deadline. The deadline is read
//! once per loop step, so a pathological branching factor cannot overshoot
//! the budget by more than one node. The candidate enumeration and the plan
//! that precede the search poll the same deadline; a call that runs out of
//! time there ends with an empty timed-out outcome.

use crate::{
    branching::{
        cheapest::CheapestFirstBuilder,
        decision::{Decision, DecisionBuilder},
    },
    candidates::CandidateCatalog,
    config::SearchConfig,
    eval::cost_model::CostModel,
    frontier::SuggestionFrontier,
    governor::TimeoutGovernor,
    monitor::{
        no_op::NoOperationMonitor,
        tree_search_monitor::{PruneReason, TreeSearchMonitor},
    },
    plan::SearchPlan,
    query::{QueryError, SuggestionQuery},
    result::{SuggestionOutcome, SuggestionTermination},
    stack::SearchStack,
    state::SearchState,
    stats::BnbSolverStatistics,
    trail::SearchTrail,
};
use docket_model::{
    cost::Cost, enrollment::Enrollment, model::SchedulingModel, request::Student,
    suggestion::Suggestion,
};

/// Relative slack of the bound test. Bounds add separately rounded costs,
/// so an exact tie may come out a few ulps above the frontier's worst cost.
const BOUND_TOLERANCE: f64 = 1e-9;

/// The search engine. It holds no state between calls other than
/// allocations.
#[derive(Clone, Debug, Default)]
pub struct SuggestionSolver {
    trail: SearchTrail,
    stack: SearchStack,
}

impl SuggestionSolver {
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
        }
    }

    /// Creates a solver with storage for `num_requests` levels of at most
    /// `max_branching` values each.
    ///
    /// # Note
    ///
    /// Every call still grows the storage to what its plan needs; this only
    /// moves the allocations to construction time.
    #[inline]
    pub fn preallocated(num_requests: usize, max_branching: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_requests),
            stack: SearchStack::preallocated(num_requests, max_branching),
        }
    }

    /// Computes the best suggestions for `query`, exploring cheap values
    /// first and reporting to no monitor.
    #[inline]
    pub fn solve(
        &mut self,
        model: &SchedulingModel,
        student: &Student,
        query: &SuggestionQuery,
        config: &SearchConfig,
    ) -> Result<SuggestionOutcome, QueryError> {
        let mut builder = CheapestFirstBuilder::new();
        self.solve_with(
            model,
            student,
            query,
            config,
            &mut builder,
            NoOperationMonitor::new(),
        )
    }

    /// Computes the best suggestions for `query` with the given branching
    /// order and monitor.
    ///
    /// The deadline starts before the query is validated, so the whole call
    /// counts against the budget. Contract violations are returned before
    /// any search work; timeout and an empty result are outcomes, not
    /// errors.
    #[inline]
    pub fn solve_with<B, S>(
        &mut self,
        model: &SchedulingModel,
        student: &Student,
        query: &SuggestionQuery,
        config: &SearchConfig,
        builder: &mut B,
        monitor: S,
    ) -> Result<SuggestionOutcome, QueryError>
    where
        B: DecisionBuilder,
        S: TreeSearchMonitor,
    {
        let governor = TimeoutGovernor::start(config.timeout());
        self.solve_within(model, student, query, config, builder, monitor, governor)
    }

    /// Like [`SuggestionSolver::solve_with`], but bounded by `governor`
    /// instead of the configured timeout.
    ///
    /// A governor built with [`TimeoutGovernor::with_check_limit`] cuts the
    /// search off after a fixed amount of work, which makes a timed-out
    /// result reproducible.
    #[allow(clippy::too_many_arguments)]
    pub fn solve_within<B, S>(
        &mut self,
        model: &SchedulingModel,
        student: &Student,
        query: &SuggestionQuery,
        config: &SearchConfig,
        builder: &mut B,
        mut monitor: S,
        mut governor: TimeoutGovernor,
    ) -> Result<SuggestionOutcome, QueryError>
    where
        B: DecisionBuilder,
        S: TreeSearchMonitor,
    {
        query.validate(model, student)?;

        let Some(catalog) = CandidateCatalog::build_within(
            model,
            student,
            config.distance_metric(),
            &mut governor,
        ) else {
            return Ok(timed_out_before_search(model, student, &mut monitor, &governor));
        };
        let costs = CostModel::new(model, student, query, &catalog, config);
        let Some(plan) = SearchPlan::build_within(&costs, &mut governor) else {
            return Ok(timed_out_before_search(model, student, &mut monitor, &governor));
        };

        let session =
            SuggestionSearchSession::new(self, costs, &plan, builder, &mut monitor, governor);
        let outcome = session.run();
        self.reset();
        Ok(outcome)
    }

    /// Clears the trail and stack, keeping their capacity.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }

    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        self.trail.allocated_memory_bytes() + self.stack.allocated_memory_bytes()
    }
}

impl std::fmt::Display for SuggestionSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SuggestionSolver({}, {})", self.trail, self.stack)
    }
}

/// Computes the best suggestions for `query` with a fresh solver.
///
/// # Examples
///
/// ```rust
/// # use docket_bnb::{bnb::compute_suggestions, config::SearchConfig, query::SuggestionQuery};
/// # use docket_model::{model::ModelBuilder, request::Student, time::TimePattern};
/// let mut b = ModelBuilder::new();
/// let cs101 = b.add_course(101, "CS101");
/// let lec = b.add_subpart(cs101, 1, "Lec", None).unwrap();
/// let s1 = b.add_section(lec, 1, "S1").unwrap();
/// let s2 = b.add_section(lec, 2, "S2").unwrap();
/// b.set_section_limit(s1, Some(0))
///     .set_section_time(s1, TimePattern::new(0b10, 120, 10).unwrap())
///     .set_section_time(s2, TimePattern::new(0b1000, 120, 10).unwrap());
/// let model = b.build().unwrap();
///
/// let mut student = Student::new(1);
/// let request = student.add_course_request(1, vec![cs101]).unwrap();
/// let mut query = SuggestionQuery::new(request);
/// query.select_section(s1).prefer_section(request, s1);
///
/// let outcome = compute_suggestions(&model, &student, &query, &SearchConfig::default()).unwrap();
/// assert_eq!(outcome.len(), 1);
/// assert_eq!(outcome.suggestions()[0].enrollments()[0].sections(), &[s2]);
/// assert!(!outcome.timeout_reached());
/// ```
#[inline]
pub fn compute_suggestions(
    model: &SchedulingModel,
    student: &Student,
    query: &SuggestionQuery,
    config: &SearchConfig,
) -> Result<SuggestionOutcome, QueryError> {
    SuggestionSolver::new().solve(model, student, query, config)
}

/// The outcome of a call whose deadline passed while the candidates or the
/// plan were still being built. No node was explored.
fn timed_out_before_search<S>(
    model: &SchedulingModel,
    student: &Student,
    monitor: &mut S,
    governor: &TimeoutGovernor,
) -> SuggestionOutcome
where
    S: TreeSearchMonitor,
{
    let mut stats = BnbSolverStatistics::default();
    monitor.on_enter_search(model, student, &stats);
    monitor.on_timeout(&stats);
    stats.set_total_time(governor.elapsed());
    monitor.on_exit_search(&stats);
    SuggestionOutcome::timed_out(Vec::new(), stats)
}

/// The per-call state of one search.
struct SuggestionSearchSession<'a, B, S> {
    solver: &'a mut SuggestionSolver,
    costs: CostModel<'a>,
    plan: &'a SearchPlan,
    builder: &'a mut B,
    monitor: &'a mut S,
    governor: TimeoutGovernor,
    frontier: SuggestionFrontier,
    state: SearchState,
    stats: BnbSolverStatistics,
}

impl<B, S> std::fmt::Display for SuggestionSearchSession<'_, B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuggestionSearchSession(state: {}, frontier: {}, {})",
            self.state, self.frontier, self.governor
        )
    }
}

impl<'a, B, S> SuggestionSearchSession<'a, B, S>
where
    B: DecisionBuilder,
    S: TreeSearchMonitor,
{
    #[inline]
    fn new(
        solver: &'a mut SuggestionSolver,
        costs: CostModel<'a>,
        plan: &'a SearchPlan,
        builder: &'a mut B,
        monitor: &'a mut S,
        governor: TimeoutGovernor,
    ) -> Self {
        Self {
            solver,
            costs,
            plan,
            builder,
            monitor,
            governor,
            frontier: SuggestionFrontier::new(costs.config().max_suggestions()),
            state: SearchState::new(costs.student().num_requests()),
            stats: BnbSolverStatistics::default(),
        }
    }

    fn run(mut self) -> SuggestionOutcome {
        self.monitor
            .on_enter_search(self.costs.model(), self.costs.student(), &self.stats);

        if self.frontier.capacity() == 0 {
            return self.finalize_result(SuggestionTermination::Exhausted);
        }
        if self.plan.is_infeasible() {
            let empty_levels = self.plan.levels().iter().filter(|l| l.is_empty()).count();
            self.stats.on_pruning_infeasible(empty_levels as u64);
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return self.finalize_result(SuggestionTermination::Infeasible);
        }

        self.initialize();

        let termination = loop {
            self.monitor.on_step(&self.state, &self.stats);

            if self.governor.expired() {
                self.monitor.on_timeout(&self.stats);
                break SuggestionTermination::TimeoutReached;
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break SuggestionTermination::Exhausted;
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        };

        self.finalize_result(termination)
    }

    /// Builds the outcome from the frontier. Consumes the session.
    fn finalize_result(mut self, termination: SuggestionTermination) -> SuggestionOutcome {
        self.stats.set_total_time(self.governor.elapsed());
        self.monitor.on_exit_search(&self.stats);

        let capacity = self.frontier.capacity();
        let suggestions = self.frontier.into_sorted_vec();
        match termination {
            SuggestionTermination::Exhausted if capacity == 0 => {
                SuggestionOutcome::empty(SuggestionTermination::Exhausted, self.stats)
            }
            SuggestionTermination::Exhausted => SuggestionOutcome::exhausted(suggestions, self.stats),
            SuggestionTermination::Infeasible => {
                SuggestionOutcome::empty(SuggestionTermination::Infeasible, self.stats)
            }
            SuggestionTermination::TimeoutReached => {
                SuggestionOutcome::timed_out(suggestions, self.stats)
            }
        }
    }

    /// Sizes the trail and stack for this plan, opens the root frame and
    /// enqueues the values of the first level.
    fn initialize(&mut self) {
        debug_assert!(
            !self.plan.is_empty(),
            "called `SuggestionSearchSession::initialize` with an empty plan"
        );

        self.solver.trail.ensure_capacity(self.plan.len());
        self.solver
            .stack
            .ensure_capacity(self.plan.len(), self.plan.max_branching());

        // Root frame. Must exist before the first decisions are pushed.
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();

        self.expand();
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    fn process_next_decision(&mut self) {
        let Some(decision) = self.solver.stack.pop() else {
            return;
        };
        self.stats.on_decision_generated();

        if let Some(reason) = self.prune_reason(&decision) {
            match reason {
                PruneReason::ChangeLimit => self.stats.on_pruning_change_limit(),
                PruneReason::BoundDominated => self.stats.on_pruning_bound(),
                PruneReason::Infeasible => self.stats.on_pruning_infeasible(1),
            }
            self.monitor.on_prune(&self.state, reason, &self.stats);
            return;
        }

        self.descend(decision);
    }

    /// Returns why `decision` must not be explored, if it must not.
    #[inline]
    fn prune_reason(&self, decision: &Decision) -> Option<PruneReason> {
        if let Some(limit) = self.costs.config().max_changes()
            && decision.penalties().changes > limit
        {
            return Some(PruneReason::ChangeLimit);
        }

        if self.frontier.is_full() {
            let bound = decision.cost() + self.plan.remaining_bound(self.state.depth() + 1);
            if is_dominated(bound, self.frontier.worst_admitted_cost()) {
                return Some(PruneReason::BoundDominated);
            }
        }

        None
    }

    /// Applies `decision` in a new frame. Offers the suggestion at a leaf,
    /// enqueues the next level otherwise.
    fn descend(&mut self, decision: Decision) {
        self.solver.trail.push_frame();
        self.solver.trail.apply_assignment(
            &mut self.state,
            decision.request(),
            decision.choice(),
            *decision.penalties(),
            decision.cost(),
        );
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        if self.state.is_complete() {
            self.handle_complete_suggestion();
            return;
        }

        self.expand();
    }

    /// Pushes the feasible values of the next level. Values the builder
    /// dropped for conflicts are counted as infeasible prunings.
    fn expand(&mut self) {
        let level_size = self.plan.level(self.state.depth()).len();

        let decisions = self
            .builder
            .next_decisions(&self.costs, self.plan, &self.state);
        let count_before = self.solver.stack.num_entries();
        self.solver.stack.extend(decisions);
        let added = self.solver.stack.num_entries() - count_before;

        let infeasible = level_size.saturating_sub(added);
        if infeasible > 0 {
            self.stats.on_pruning_infeasible(infeasible as u64);
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
        }
        self.monitor
            .on_decisions_enqueued(&self.state, added, &self.stats);
    }

    fn handle_complete_suggestion(&mut self) {
        debug_assert_eq!(
            self.costs
                .evaluate(&self.state.iter_placed().collect::<Vec<_>>()),
            Some(*self.state.penalties()),
            "called `SuggestionSearchSession::handle_complete_suggestion` with running penalties that disagree with a full evaluation"
        );

        let catalog = self.costs.catalog();
        let enrollments: Vec<Enrollment> = self
            .state
            .iter_placed()
            .filter_map(|(request, choice)| {
                choice
                    .candidate()
                    .map(|index| catalog.candidate(request, index).enrollment().clone())
            })
            .collect();
        let suggestion = Suggestion::new(
            self.costs.model(),
            self.state.cost(),
            *self.state.penalties(),
            enrollments,
        );

        let admitted = self.frontier.admits(&suggestion);
        self.stats.on_suggestion_found(admitted);
        self.monitor
            .on_suggestion_found(&suggestion, admitted, &self.stats);
        if admitted {
            self.frontier.offer(suggestion);
        }
    }
}

/// Returns `true` if a subtree whose cost is at least `bound` can never
/// rank before the frontier's worst entry. Equal costs are kept, the
/// tie-break may still favor them.
#[inline]
fn is_dominated(bound: Cost, worst: Cost) -> bool {
    let worst = worst.value();
    bound.value() > worst + BOUND_TOLERANCE * (1.0 + worst.abs())
}
