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
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use docket_model::{cost::Cost, model::SchedulingModel, request::Student, suggestion::Suggestion};
use std::time::{Duration, Instant};

/// Reports search progress through the `log` facade.
///
/// A progress line is written at most once per `log_interval`. The clock is
/// only read when the node count masked with `clock_check_mask` is zero, so
/// the monitor stays cheap on the hot path.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_cost: Option<Cost>,
    lines_written: u64,
}

impl LogTreeSearchMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_cost: None,
            lines_written: 0,
        }
    }

    /// Returns the cost of the best admitted suggestion seen so far.
    #[inline]
    pub fn best_cost(&self) -> Option<Cost> {
        self.best_cost
    }

    /// Returns the number of progress lines emitted.
    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    fn log_header(&self) {
        log::info!(
            "{:<9} | {:<12} | {:<6} | {:<12} | {:<12} | {:<10} | {:<10}",
            "Elapsed",
            "Nodes",
            "Depth",
            "Best Cost",
            "Current",
            "Backtracks",
            "Pruned"
        );
    }

    fn log_line(&mut self, state: &SearchState, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        let elapsed = format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32());
        let best = self
            .best_cost
            .map_or_else(|| "Inf".to_string(), |c| format!("{:.3}", c.value()));
        log::info!(
            "{:<9} | {:<12} | {:<6} | {:<12} | {:<12.3} | {:<10} | {:<10}",
            elapsed,
            stats.nodes_explored,
            state.depth(),
            best,
            state.cost().value(),
            stats.backtracks,
            stats.prunings_total()
        );
        self.last_log_time = now;
        self.lines_written += 1;
    }
}

impl Default for LogTreeSearchMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogTreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}ms, clock_check_mask: {})",
            self.log_interval.as_millis(),
            self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogTreeSearchMonitor {
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        model: &SchedulingModel,
        student: &Student,
        _statistics: &BnbSolverStatistics,
    ) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_cost = None;
        self.lines_written = 0;
        log::debug!(
            "suggestion search for student {} ({} requests, {} sections in model)",
            student.id(),
            student.num_requests(),
            model.num_sections()
        );
        self.log_header();
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        log::info!(
            "search finished after {}ms: {} nodes, {} suggestions admitted",
            statistics.time_total.as_millis(),
            statistics.nodes_explored,
            statistics.suggestions_admitted
        );
        log::debug!("{}", statistics);
    }

    fn on_prune(
        &mut self,
        state: &SearchState,
        reason: PruneReason,
        _statistics: &BnbSolverStatistics,
    ) {
        log::trace!("pruned at depth {}: {}", state.depth(), reason);
    }

    fn on_descend(
        &mut self,
        state: &SearchState,
        _decision: Decision,
        statistics: &BnbSolverStatistics,
    ) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, statistics);
        }
    }

    fn on_suggestion_found(
        &mut self,
        suggestion: &Suggestion,
        admitted: bool,
        _statistics: &BnbSolverStatistics,
    ) {
        if admitted {
            let cost = suggestion.cost();
            if self.best_cost.is_none_or(|best| cost < best) {
                self.best_cost = Some(cost);
            }
        }
        log::trace!(
            "suggestion {} (cost {:.3})",
            if admitted { "admitted" } else { "rejected" },
            suggestion.cost().value()
        );
    }

    fn on_timeout(&mut self, statistics: &BnbSolverStatistics) {
        log::debug!(
            "suggestion search timed out after {} nodes",
            statistics.nodes_explored
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::decision::Choice;
    use docket_model::{index::RequestIndex, model::ModelBuilder, suggestion::PenaltyCounts};

    fn decision() -> Decision {
        Decision::new(
            RequestIndex::new(0),
            Choice::Unassigned,
            PenaltyCounts::default(),
            Cost::ZERO,
        )
    }

    #[test]
    fn test_progress_lines_respect_mask_and_interval() {
        let model = ModelBuilder::new().build().unwrap();
        let student = Student::new(3);
        let state = SearchState::new(1);
        let mut stats = BnbSolverStatistics::default();

        let mut monitor = LogTreeSearchMonitor::new(Duration::ZERO, 1);
        monitor.on_enter_search(&model, &student, &stats);

        stats.nodes_explored = 1;
        monitor.on_descend(&state, decision(), &stats);
        assert_eq!(monitor.lines_written(), 0);

        stats.nodes_explored = 2;
        monitor.on_descend(&state, decision(), &stats);
        assert_eq!(monitor.lines_written(), 1);

        let mut slow = LogTreeSearchMonitor::new(Duration::from_secs(3600), 0);
        slow.on_enter_search(&model, &student, &stats);
        slow.on_descend(&state, decision(), &stats);
        assert_eq!(slow.lines_written(), 0);
    }

    #[test]
    fn test_tracks_best_admitted_cost() {
        let mut b = ModelBuilder::new();
        let c = b.add_course(1, "C");
        let sp = b.add_subpart(c, 1, "Lec", None).unwrap();
        b.add_section(sp, 10, "1").unwrap();
        let model = b.build().unwrap();
        let stats = BnbSolverStatistics::default();
        let make = |cost: f64| {
            Suggestion::new(&model, Cost::new(cost), PenaltyCounts::default(), Vec::new())
        };

        let mut monitor = LogTreeSearchMonitor::default();
        monitor.on_suggestion_found(&make(2.0), true, &stats);
        monitor.on_suggestion_found(&make(1.0), false, &stats);
        monitor.on_suggestion_found(&make(1.5), true, &stats);
        assert_eq!(monitor.best_cost(), Some(Cost::new(1.5)));
        assert_eq!(
            format!("{}", monitor),
            "LogTreeSearchMonitor(log_interval: 1000ms, clock_check_mask: 4095)"
        );
    }
}
