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
    classify::{ClassAssignment, classify, resolve_selection},
    error::SectioningError,
};
use docket_bnb::{bnb::SuggestionSolver, config::SearchConfig};
use docket_model::{model::SchedulingModel, request::Student, suggestion::Suggestion};
use std::time::{Duration, Instant};

/// What the student gets back from a suggestion request.
#[derive(Debug, Clone)]
pub struct SuggestionsResponse {
    messages: Vec<String>,
    suggestions: Vec<Suggestion>,
    elapsed: Duration,
    timeout_reached: bool,
}

impl SuggestionsResponse {
    /// Returns the notes about classes of the current schedule that could
    /// not be kept.
    #[inline]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Returns the suggestions, best first.
    #[inline]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    #[inline]
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.suggestions
    }

    /// Returns the wall time of the whole action.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn timeout_reached(&self) -> bool {
        self.timeout_reached
    }
}

impl std::fmt::Display for SuggestionsResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SuggestionsResponse(suggestions: {}, messages: {}, elapsed: {}ms, timeout reached: {})",
            self.suggestions.len(),
            self.messages.len(),
            self.elapsed.as_millis(),
            self.timeout_reached
        )
    }
}

/// Computes alternatives to one class or free time of a student's schedule.
///
/// # Examples
///
/// ```rust
/// # use docket_bnb::config::SearchConfig;
/// # use docket_model::{model::ModelBuilder, request::Student, time::TimePattern};
/// # use docket_solver::{action::ComputeSuggestionsAction, classify::ClassAssignment};
/// let mut b = ModelBuilder::new();
/// let cs101 = b.add_course(101, "CS101");
/// let lec = b.add_subpart(cs101, 1, "Lec", None).unwrap();
/// b.add_section(lec, 1, "S1").unwrap();
/// let s2 = b.add_section(lec, 2, "S2").unwrap();
/// b.set_section_time(s2, TimePattern::new(0b1000, 120, 10).unwrap());
/// let model = b.build().unwrap();
///
/// let mut student = Student::new(7);
/// student.add_course_request(1, vec![cs101]).unwrap();
///
/// let current = ClassAssignment::class(101, 1).with_saved(true);
/// let action = ComputeSuggestionsAction::new(student, vec![current.clone()], current);
/// let response = action.execute(&model, &SearchConfig::default()).unwrap();
/// assert_eq!(response.suggestions().len(), 1);
/// assert_eq!(response.suggestions()[0].enrollments()[0].sections(), &[s2]);
/// assert!(response.messages().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ComputeSuggestionsAction {
    student: Student,
    assignments: Vec<ClassAssignment>,
    selection: ClassAssignment,
}

impl ComputeSuggestionsAction {
    pub fn new(
        student: Student,
        assignments: Vec<ClassAssignment>,
        selection: ClassAssignment,
    ) -> Self {
        Self {
            student,
            assignments,
            selection,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        "suggestions"
    }

    #[inline]
    pub fn student(&self) -> &Student {
        &self.student
    }

    #[inline]
    pub fn assignments(&self) -> &[ClassAssignment] {
        &self.assignments
    }

    #[inline]
    pub fn selection(&self) -> &ClassAssignment {
        &self.selection
    }

    /// Runs the action against `model`.
    ///
    /// Fails with `SectioningError::EmptyCourseRequest` if the student has
    /// no primary request, and with `SectioningError::UnknownSelection` if
    /// the selection is not part of any request. A timeout is reported in
    /// the response, not as an error.
    pub fn execute(
        &self,
        model: &SchedulingModel,
        config: &SearchConfig,
    ) -> Result<SuggestionsResponse, SectioningError> {
        let start = Instant::now();

        let has_primary = self
            .student
            .requests()
            .iter()
            .any(|r| r.as_course().is_none_or(|c| !c.is_alternative()));
        if !has_primary {
            return Err(SectioningError::EmptyCourseRequest);
        }
        self.student.validate(model)?;

        let classification = classify(model, &self.student, &self.assignments);
        let selection = resolve_selection(model, &self.student, &self.selection)?;
        let query = classification.to_query(selection);
        let model_done = Instant::now();

        let mut solver =
            SuggestionSolver::preallocated(self.student.num_requests(), model.num_sections());
        let init_done = Instant::now();

        let outcome = solver.solve(model, &self.student, &query, config)?;
        let search_done = Instant::now();
        log::debug!(
            "  -- suggestion B&B took {}ms{}",
            outcome.elapsed_time().as_millis(),
            if outcome.timeout_reached() {
                ", timeout reached"
            } else {
                ""
            }
        );

        let timeout_reached = outcome.timeout_reached();
        let suggestions = outcome.into_suggestions();
        let messages = classification.into_messages();
        let end = Instant::now();

        log::info!(
            "Sectioning took {}ms (model {}ms, solver init {}ms, sectioning {}ms, conversion {}ms)",
            (end - start).as_millis(),
            (model_done - start).as_millis(),
            (init_done - model_done).as_millis(),
            (search_done - init_done).as_millis(),
            (end - search_done).as_millis()
        );

        Ok(SuggestionsResponse {
            messages,
            suggestions,
            elapsed: end - start,
            timeout_reached,
        })
    }
}

impl std::fmt::Display for ComputeSuggestionsAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ComputeSuggestionsAction(student: {}, assignments: {}, selection: {})",
            self.student.id(),
            self.assignments.len(),
            self.selection
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_model::{index::CourseIndex, model::ModelBuilder, time::TimePattern};

    fn tp(days: u8, start: u16, length: u16) -> TimePattern {
        TimePattern::new(days, start, length).unwrap()
    }

    /// MTH 200 (id 200): Lec 1 Tue 10:00 full, Lec 2 Thu 10:00.
    /// PHY 300 (id 300): Lec 5 Thu 10:00.
    fn fixture() -> SchedulingModel {
        let mut b = ModelBuilder::new();
        let mth = b.add_course(200, "MTH 200");
        let lec = b.add_subpart(mth, 1, "Lec", None).unwrap();
        let l1 = b.add_section(lec, 1, "1").unwrap();
        let l2 = b.add_section(lec, 2, "2").unwrap();
        b.set_section_time(l1, tp(0b10, 120, 10))
            .set_section_limit(l1, Some(30))
            .set_section_enrolled(l1, 30)
            .set_section_time(l2, tp(0b1000, 120, 10));
        let phy = b.add_course(300, "PHY 300");
        let lec = b.add_subpart(phy, 2, "Lec", None).unwrap();
        let l5 = b.add_section(lec, 5, "5").unwrap();
        b.set_section_time(l5, tp(0b1000, 120, 10));
        b.build().unwrap()
    }

    fn student() -> Student {
        let mut s = Student::new(42);
        s.add_course_request(1, vec![CourseIndex::new(0)]).unwrap();
        s.add_course_request(2, vec![CourseIndex::new(1)]).unwrap();
        s
    }

    #[test]
    fn test_pinned_class_blocks_conflicting_alternative() {
        let model = fixture();
        let rows = vec![
            ClassAssignment::class(200, 1),
            ClassAssignment::class(300, 5).with_pinned(true),
        ];
        let action = ComputeSuggestionsAction::new(student(), rows, ClassAssignment::class(200, 1));
        let response = action.execute(&model, &SearchConfig::default()).unwrap();

        // Lec 1 is full and Lec 2 clashes with the pinned PHY class.
        assert!(response.suggestions().is_empty());
        assert!(!response.timeout_reached());
        assert_eq!(action.name(), "suggestions");
    }

    #[test]
    fn test_unpinned_class_may_move_aside() {
        let model = fixture();
        let rows = vec![
            ClassAssignment::class(200, 1),
            ClassAssignment::class(300, 5),
        ];
        let action = ComputeSuggestionsAction::new(student(), rows, ClassAssignment::class(200, 1));
        let response = action.execute(&model, &SearchConfig::default()).unwrap();

        let best = &response.suggestions()[0];
        let l2 = model.find_section(CourseIndex::new(0), 2).unwrap();
        assert_eq!(best.enrollments()[0].sections(), &[l2]);
        // PHY cannot keep Lec 5 next to MTH Lec 2, so it is left unassigned.
        assert_eq!(best.enrollments().len(), 1);
    }

    #[test]
    fn test_unavailable_class_message_is_returned() {
        let model = fixture();
        let rows = vec![
            ClassAssignment::class(200, 9)
                .with_saved(true)
                .with_labels("MTH", "200", "Lec", "9"),
        ];
        let action = ComputeSuggestionsAction::new(student(), rows, ClassAssignment::course(200));
        let response = action.execute(&model, &SearchConfig::default()).unwrap();
        assert_eq!(
            response.messages(),
            &["Enrolled class MTH 200 Lec 9 is no longer available.".to_string()]
        );
        assert!(!response.suggestions().is_empty());
    }

    #[test]
    fn test_only_alternatives_is_an_empty_request() {
        let model = fixture();
        let mut s = Student::new(1);
        s.add_alternative_course_request(1, vec![CourseIndex::new(0)])
            .unwrap();
        let action = ComputeSuggestionsAction::new(s, vec![], ClassAssignment::course(200));
        assert_eq!(
            action.execute(&model, &SearchConfig::default()).unwrap_err(),
            SectioningError::EmptyCourseRequest
        );

        let action =
            ComputeSuggestionsAction::new(Student::new(2), vec![], ClassAssignment::course(200));
        assert_eq!(
            action.execute(&model, &SearchConfig::default()).unwrap_err(),
            SectioningError::EmptyCourseRequest
        );
    }

    #[test]
    fn test_unknown_selection_fails() {
        let model = fixture();
        let action = ComputeSuggestionsAction::new(student(), vec![], ClassAssignment::course(999));
        assert_eq!(
            action.execute(&model, &SearchConfig::default()).unwrap_err(),
            SectioningError::UnknownSelection
        );
    }

    #[test]
    fn test_free_time_selection_runs_search() {
        let model = fixture();
        let mut s = student();
        let evening = tp(0b11111, 216, 24);
        s.add_free_time_request(3, evening);
        let rows = vec![ClassAssignment::free_time(evening).with_pinned(true)];
        let action = ComputeSuggestionsAction::new(s, rows, ClassAssignment::free_time(evening));
        let response = action.execute(&model, &SearchConfig::default()).unwrap();

        // The selected free time is released. MTH Lec 2 and PHY Lec 5
        // clash, so exactly one course is placed.
        let best = &response.suggestions()[0];
        assert_eq!(best.enrollments().len(), 1);
        assert!(!best.enrollments()[0].is_free_time());
        assert_eq!(best.penalties().unassigned, 1);
    }
}
