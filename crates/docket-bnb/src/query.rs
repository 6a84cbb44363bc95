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

//! The classified input of one suggestion call.
//!
//! A `SuggestionQuery` tells the engine which request the student wants to
//! change (and optionally which section of it), which sections and free times
//! are locked in place, and which sections the student currently holds.
//! `validate` enforces the call contract before any search work begins.

use docket_model::{
    error::ModelError,
    index::{RequestIndex, SectionIndex},
    model::SchedulingModel,
    request::{RequestKind, Student},
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Contract violations detected at call entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The student has no requests at all.
    NoRequests,
    /// The catalogue or the student is malformed.
    Model(ModelError),
    /// A request index does not refer to one of the student's requests.
    UnknownRequest(RequestIndex),
    /// The selected section is not part of the selected course request.
    SelectedSectionNotInRequest {
        request: RequestIndex,
        section: SectionIndex,
    },
    /// A required or preferred section is not part of its course request.
    SectionNotInRequest {
        request: RequestIndex,
        section: SectionIndex,
    },
    /// Sections were attached to a free-time request.
    SectionsOnFreeTime(RequestIndex),
    /// A required free time names a course request.
    NotAFreeTimeRequest(RequestIndex),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoRequests => write!(f, "The student has no course requests"),
            Self::Model(e) => write!(f, "Model error: {}", e),
            Self::UnknownRequest(r) => write!(f, "Unknown request {}", r),
            Self::SelectedSectionNotInRequest { request, section } => write!(
                f,
                "Selected section {} does not belong to selected request {}",
                section, request
            ),
            Self::SectionNotInRequest { request, section } => write!(
                f,
                "Section {} does not belong to request {}",
                section, request
            ),
            Self::SectionsOnFreeTime(r) => {
                write!(f, "Request {} is a free time and cannot hold sections", r)
            }
            Self::NotAFreeTimeRequest(r) => write!(f, "Request {} is not a free time", r),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModelError> for QueryError {
    fn from(e: ModelError) -> Self {
        QueryError::Model(e)
    }
}

/// Required, preferred and selected inputs of a suggestion call.
///
/// # Examples
///
/// ```rust
/// # use docket_bnb::query::SuggestionQuery;
/// # use docket_model::index::{RequestIndex, SectionIndex};
/// let mut query = SuggestionQuery::new(RequestIndex::new(1));
/// query
///     .require_section(RequestIndex::new(0), SectionIndex::new(3))
///     .prefer_section(RequestIndex::new(1), SectionIndex::new(5))
///     .select_section(SectionIndex::new(5));
/// assert!(query.is_required(RequestIndex::new(0)));
/// assert_eq!(query.selected_section(), Some(SectionIndex::new(5)));
/// ```
#[derive(Clone, Debug)]
pub struct SuggestionQuery {
    selected_request: RequestIndex,
    selected_section: Option<SectionIndex>,
    required: FxHashMap<RequestIndex, FxHashSet<SectionIndex>>,
    required_free_times: FxHashSet<RequestIndex>,
    preferred: FxHashMap<RequestIndex, FxHashSet<SectionIndex>>,
}

impl SuggestionQuery {
    /// Creates a query that asks to change `selected_request`.
    #[inline]
    pub fn new(selected_request: RequestIndex) -> Self {
        Self {
            selected_request,
            selected_section: None,
            required: FxHashMap::default(),
            required_free_times: FxHashSet::default(),
            preferred: FxHashMap::default(),
        }
    }

    /// Names the section of the selected request that must be replaced.
    #[inline]
    pub fn select_section(&mut self, section: SectionIndex) -> &mut Self {
        self.selected_section = Some(section);
        self
    }

    /// Locks `section` into `request`.
    #[inline]
    pub fn require_section(&mut self, request: RequestIndex, section: SectionIndex) -> &mut Self {
        self.required.entry(request).or_default().insert(section);
        self
    }

    /// Locks the free-time request in place.
    #[inline]
    pub fn require_free_time(&mut self, request: RequestIndex) -> &mut Self {
        self.required_free_times.insert(request);
        self
    }

    /// Records `section` as currently held by `request`.
    #[inline]
    pub fn prefer_section(&mut self, request: RequestIndex, section: SectionIndex) -> &mut Self {
        self.preferred.entry(request).or_default().insert(section);
        self
    }

    #[inline]
    pub fn selected_request(&self) -> RequestIndex {
        self.selected_request
    }

    #[inline]
    pub fn selected_section(&self) -> Option<SectionIndex> {
        self.selected_section
    }

    #[inline]
    pub fn is_selected(&self, request: RequestIndex) -> bool {
        self.selected_request == request
    }

    /// Returns the required sections of `request`, if any.
    #[inline]
    pub fn required_sections(&self, request: RequestIndex) -> Option<&FxHashSet<SectionIndex>> {
        self.required.get(&request).filter(|s| !s.is_empty())
    }

    /// Returns `true` if the request is locked, ignoring the selected request.
    #[inline]
    pub fn is_required(&self, request: RequestIndex) -> bool {
        !self.is_selected(request)
            && (self.required_sections(request).is_some()
                || self.required_free_times.contains(&request))
    }

    #[inline]
    pub fn is_required_free_time(&self, request: RequestIndex) -> bool {
        self.required_free_times.contains(&request)
    }

    /// Returns the sections `request` currently holds.
    #[inline]
    pub fn preferred_sections(&self, request: RequestIndex) -> Option<&FxHashSet<SectionIndex>> {
        self.preferred.get(&request).filter(|s| !s.is_empty())
    }

    /// Checks the query against the catalogue and the student.
    pub fn validate(&self, model: &SchedulingModel, student: &Student) -> Result<(), QueryError> {
        if student.num_requests() == 0 {
            return Err(QueryError::NoRequests);
        }
        student.validate(model)?;

        let selected = student
            .get_request(self.selected_request)
            .ok_or(QueryError::UnknownRequest(self.selected_request))?;

        if let Some(section) = self.selected_section {
            let belongs = match selected.kind() {
                RequestKind::Course(c) => c
                    .courses()
                    .iter()
                    .any(|&course| model.course_contains_section(course, section)),
                RequestKind::FreeTime(_) => false,
            };
            if !belongs {
                return Err(QueryError::SelectedSectionNotInRequest {
                    request: self.selected_request,
                    section,
                });
            }
        }

        for (&request, sections) in self.required.iter().chain(self.preferred.iter()) {
            let req = student
                .get_request(request)
                .ok_or(QueryError::UnknownRequest(request))?;
            let course_request = match req.kind() {
                RequestKind::Course(c) => c,
                RequestKind::FreeTime(_) => {
                    if sections.is_empty() {
                        continue;
                    }
                    return Err(QueryError::SectionsOnFreeTime(request));
                }
            };
            for &section in sections {
                let belongs = course_request
                    .courses()
                    .iter()
                    .any(|&course| model.course_contains_section(course, section));
                if !belongs {
                    return Err(QueryError::SectionNotInRequest { request, section });
                }
            }
        }

        for &request in &self.required_free_times {
            let req = student
                .get_request(request)
                .ok_or(QueryError::UnknownRequest(request))?;
            if !req.is_free_time() {
                return Err(QueryError::NotAFreeTimeRequest(request));
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for SuggestionQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SuggestionQuery(selected: {}", self.selected_request)?;
        if let Some(s) = self.selected_section {
            write!(f, " / {}", s)?;
        }
        write!(
            f,
            ", required: {}, required free times: {}, preferred: {})",
            self.required.len(),
            self.required_free_times.len(),
            self.preferred.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_model::{model::ModelBuilder, time::TimePattern};

    fn fixture() -> (SchedulingModel, Student) {
        let mut b = ModelBuilder::new();
        let a = b.add_course(1, "A");
        let sa = b.add_subpart(a, 1, "Lec", None).unwrap();
        b.add_section(sa, 10, "1").unwrap();
        b.add_section(sa, 11, "2").unwrap();
        let c = b.add_course(2, "B");
        let sb = b.add_subpart(c, 2, "Lec", None).unwrap();
        b.add_section(sb, 20, "1").unwrap();
        let model = b.build().unwrap();

        let mut student = Student::new(7);
        student.add_course_request(1, vec![a]).unwrap();
        student.add_course_request(2, vec![c]).unwrap();
        student.add_free_time_request(3, TimePattern::new(0b1, 150, 12).unwrap());
        (model, student)
    }

    #[test]
    fn test_valid_query_passes() {
        let (model, student) = fixture();
        let mut q = SuggestionQuery::new(RequestIndex::new(0));
        q.select_section(SectionIndex::new(0))
            .prefer_section(RequestIndex::new(0), SectionIndex::new(0))
            .require_section(RequestIndex::new(1), SectionIndex::new(2))
            .require_free_time(RequestIndex::new(2));
        assert_eq!(q.validate(&model, &student), Ok(()));
        assert!(q.is_required(RequestIndex::new(1)));
        assert!(q.is_required(RequestIndex::new(2)));
        assert!(!q.is_required(RequestIndex::new(0)));
    }

    #[test]
    fn test_selected_section_of_other_request_fails() {
        let (model, student) = fixture();
        let mut q = SuggestionQuery::new(RequestIndex::new(0));
        q.select_section(SectionIndex::new(2));
        assert_eq!(
            q.validate(&model, &student),
            Err(QueryError::SelectedSectionNotInRequest {
                request: RequestIndex::new(0),
                section: SectionIndex::new(2)
            })
        );
    }

    #[test]
    fn test_required_section_of_other_request_fails() {
        let (model, student) = fixture();
        let mut q = SuggestionQuery::new(RequestIndex::new(0));
        q.require_section(RequestIndex::new(1), SectionIndex::new(0));
        assert!(matches!(
            q.validate(&model, &student),
            Err(QueryError::SectionNotInRequest { .. })
        ));
    }

    #[test]
    fn test_out_of_range_and_kind_mismatches_fail() {
        let (model, student) = fixture();
        let q = SuggestionQuery::new(RequestIndex::new(9));
        assert_eq!(
            q.validate(&model, &student),
            Err(QueryError::UnknownRequest(RequestIndex::new(9)))
        );

        let mut q = SuggestionQuery::new(RequestIndex::new(0));
        q.require_free_time(RequestIndex::new(1));
        assert_eq!(
            q.validate(&model, &student),
            Err(QueryError::NotAFreeTimeRequest(RequestIndex::new(1)))
        );

        let mut q = SuggestionQuery::new(RequestIndex::new(0));
        q.prefer_section(RequestIndex::new(2), SectionIndex::new(0));
        assert_eq!(
            q.validate(&model, &student),
            Err(QueryError::SectionsOnFreeTime(RequestIndex::new(2)))
        );
    }

    #[test]
    fn test_empty_student_fails() {
        let (model, _) = fixture();
        let q = SuggestionQuery::new(RequestIndex::new(0));
        assert_eq!(
            q.validate(&model, &Student::new(1)),
            Err(QueryError::NoRequests)
        );
    }

    #[test]
    fn test_selected_request_is_never_required() {
        let mut q = SuggestionQuery::new(RequestIndex::new(0));
        q.require_section(RequestIndex::new(0), SectionIndex::new(0));
        assert!(!q.is_required(RequestIndex::new(0)));
        assert!(q.required_sections(RequestIndex::new(0)).is_some());
    }
}
