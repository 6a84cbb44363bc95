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

//! Classification of the student's current schedule.
//!
//! The caller describes the schedule on screen as a list of `ClassAssignment`
//! rows. Before a suggestion search they are turned into the required and
//! preferred sections of each course request, the pinned free times, and the
//! selected request. Rows whose class is gone or closed are reported back as
//! messages and otherwise ignored.

use crate::error::SectioningError;
use docket_bnb::query::SuggestionQuery;
use docket_model::{
    index::{CourseIndex, RequestIndex, SectionIndex},
    model::SchedulingModel,
    request::{CourseRequest, RequestKind, Student},
    time::TimePattern,
};
use rustc_hash::{FxHashMap, FxHashSet};

/// One row of the schedule currently shown to the student.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassAssignment {
    course_id: u64,
    class_id: Option<u64>,
    free_time: Option<TimePattern>,
    saved: bool,
    pinned: bool,
    subject: String,
    course_nbr: String,
    subpart: String,
    section: String,
}

impl ClassAssignment {
    /// A row for class `class_id` of course `course_id`.
    pub fn class(course_id: u64, class_id: u64) -> Self {
        Self {
            course_id,
            class_id: Some(class_id),
            ..Default::default()
        }
    }

    /// A row for course `course_id` without a class.
    pub fn course(course_id: u64) -> Self {
        Self {
            course_id,
            ..Default::default()
        }
    }

    /// A free-time row.
    pub fn free_time(time: TimePattern) -> Self {
        Self {
            free_time: Some(time),
            ..Default::default()
        }
    }

    /// Marks the row as an enrollment the student already holds.
    pub fn with_saved(mut self, saved: bool) -> Self {
        self.saved = saved;
        self
    }

    /// Marks the row as locked by the student.
    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    /// Sets the labels used in messages.
    pub fn with_labels(
        mut self,
        subject: impl Into<String>,
        course_nbr: impl Into<String>,
        subpart: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        self.subject = subject.into();
        self.course_nbr = course_nbr.into();
        self.subpart = subpart.into();
        self.section = section.into();
        self
    }

    #[inline]
    pub fn course_id(&self) -> u64 {
        self.course_id
    }

    #[inline]
    pub fn class_id(&self) -> Option<u64> {
        self.class_id
    }

    #[inline]
    pub fn free_time_pattern(&self) -> Option<&TimePattern> {
        self.free_time.as_ref()
    }

    #[inline]
    pub fn is_free_time(&self) -> bool {
        self.free_time.is_some()
    }

    #[inline]
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// The "no longer available" message of this row.
    fn unavailable_message(&self) -> String {
        let kind = if self.saved {
            "Enrolled class"
        } else if self.pinned {
            "Required class"
        } else {
            "Previously selected class"
        };
        format!(
            "{} {} {} {} {} is no longer available.",
            kind, self.subject, self.course_nbr, self.subpart, self.section
        )
    }
}

impl std::fmt::Display for ClassAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.free_time, self.class_id) {
            (Some(time), _) => write!(f, "ClassAssignment(free time {})", time),
            (None, Some(class)) => write!(
                f,
                "ClassAssignment(course: {}, class: {})",
                self.course_id, class
            ),
            (None, None) => write!(f, "ClassAssignment(course: {})", self.course_id),
        }
    }
}

/// The request (and section) the student asked to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    request: RequestIndex,
    section: Option<SectionIndex>,
}

impl Selection {
    #[inline]
    pub fn request(&self) -> RequestIndex {
        self.request
    }

    #[inline]
    pub fn section(&self) -> Option<SectionIndex> {
        self.section
    }
}

/// Required and preferred inputs derived from the current schedule.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    required: FxHashMap<RequestIndex, FxHashSet<SectionIndex>>,
    preferred: FxHashMap<RequestIndex, FxHashSet<SectionIndex>>,
    required_free_times: FxHashSet<RequestIndex>,
    messages: Vec<String>,
}

impl Classification {
    /// Returns the sections that must be kept for `request`.
    pub fn required_sections(&self, request: RequestIndex) -> Option<&FxHashSet<SectionIndex>> {
        self.required.get(&request)
    }

    /// Returns the sections `request` currently holds.
    pub fn preferred_sections(&self, request: RequestIndex) -> Option<&FxHashSet<SectionIndex>> {
        self.preferred.get(&request)
    }

    pub fn is_required_free_time(&self, request: RequestIndex) -> bool {
        self.required_free_times.contains(&request)
    }

    /// Returns the messages about rows that could not be kept.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    /// Builds the query of a suggestion search for `selection`.
    pub fn to_query(&self, selection: Selection) -> SuggestionQuery {
        let mut query = SuggestionQuery::new(selection.request);
        if let Some(section) = selection.section {
            query.select_section(section);
        }
        for (&request, sections) in &self.required {
            for &section in sections {
                query.require_section(request, section);
            }
        }
        for (&request, sections) in &self.preferred {
            for &section in sections {
                query.prefer_section(request, section);
            }
        }
        for &request in &self.required_free_times {
            query.require_free_time(request);
        }
        query
    }
}

/// Returns the course of `request` whose external id is `course_id`.
fn request_course(
    model: &SchedulingModel,
    request: &CourseRequest,
    course_id: u64,
) -> Option<CourseIndex> {
    request
        .courses()
        .iter()
        .copied()
        .find(|&c| model.course(c).id() == course_id)
}

/// Sorts the current schedule into required and preferred sections.
///
/// For every course request, each class row of one of its courses is looked
/// up; a class that no longer exists or has no seats at all is reported and
/// skipped. Saved or pinned classes are required, every kept class is
/// preferred. A free-time request is required when a pinned free-time row
/// has exactly its days, start and length.
pub fn classify(
    model: &SchedulingModel,
    student: &Student,
    assignments: &[ClassAssignment],
) -> Classification {
    let mut out = Classification::default();

    for (i, request) in student.requests().iter().enumerate() {
        let index = RequestIndex::new(i);
        match request.kind() {
            RequestKind::Course(course_request) => {
                for row in assignments.iter().filter(|a| !a.is_free_time()) {
                    let (Some(course), Some(class_id)) = (
                        request_course(model, course_request, row.course_id),
                        row.class_id,
                    ) else {
                        continue;
                    };
                    let section = model
                        .find_section(course, class_id)
                        .filter(|&s| model.section(s).limit() != Some(0));
                    let Some(section) = section else {
                        out.messages.push(row.unavailable_message());
                        continue;
                    };
                    if row.saved || row.pinned {
                        out.required.entry(index).or_default().insert(section);
                    }
                    out.preferred.entry(index).or_default().insert(section);
                }
            }
            RequestKind::FreeTime(free_time) => {
                let pinned = assignments.iter().any(|a| {
                    a.pinned && a.free_time.as_ref().is_some_and(|t| t == free_time.time())
                });
                if pinned {
                    out.required_free_times.insert(index);
                }
            }
        }
    }

    out
}

/// Finds the request the selected row belongs to.
///
/// A class row resolves to the first course request offering its course,
/// and to the section of its class if that exists. A free-time row resolves
/// to the first free-time request with the same pattern.
///
/// Requests are kept in priority order, so when a course is listed by more
/// than one request the earliest one wins: a primary request is chosen over
/// an alternative that repeats its course.
pub fn resolve_selection(
    model: &SchedulingModel,
    student: &Student,
    selection: &ClassAssignment,
) -> Result<Selection, SectioningError> {
    for (i, request) in student.requests().iter().enumerate() {
        let index = RequestIndex::new(i);
        match (request.kind(), &selection.free_time) {
            (RequestKind::Course(course_request), None) => {
                if let Some(course) = request_course(model, course_request, selection.course_id) {
                    let section = selection
                        .class_id
                        .and_then(|class_id| model.find_section(course, class_id));
                    return Ok(Selection {
                        request: index,
                        section,
                    });
                }
            }
            (RequestKind::FreeTime(free_time), Some(time)) => {
                if free_time.time() == time {
                    return Ok(Selection {
                        request: index,
                        section: None,
                    });
                }
            }
            _ => {}
        }
    }
    Err(SectioningError::UnknownSelection)
}
