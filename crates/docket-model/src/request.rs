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

//! Student requests.
//!
//! A student asks for a list of requests in priority order. Each is either a
//! course request (one of several alternative courses) or a free-time block
//! the student wants kept clear.

use crate::{
    error::ModelError,
    index::{CourseIndex, RequestIndex},
    model::SchedulingModel,
    time::TimePattern,
};

/// A request for one of several alternative courses, first choice first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseRequest {
    courses: Vec<CourseIndex>,
    alternative: bool,
}

impl CourseRequest {
    #[inline]
    pub fn courses(&self) -> &[CourseIndex] {
        &self.courses
    }

    /// Returns `true` if this is a backup request from the alternatives list.
    #[inline]
    pub fn is_alternative(&self) -> bool {
        self.alternative
    }

    /// Returns `true` if `course` is one of the requested alternatives.
    #[inline]
    pub fn contains_course(&self, course: CourseIndex) -> bool {
        self.courses.contains(&course)
    }
}

/// A block of time the student wants to keep free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeTimeRequest {
    time: TimePattern,
}

impl FreeTimeRequest {
    #[inline]
    pub fn time(&self) -> &TimePattern {
        &self.time
    }
}

/// The two kinds of request a student can make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Course(CourseRequest),
    FreeTime(FreeTimeRequest),
}

/// A single entry of a student's request list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    id: u64,
    kind: RequestKind,
}

impl Request {
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    #[inline]
    pub fn as_course(&self) -> Option<&CourseRequest> {
        match &self.kind {
            RequestKind::Course(c) => Some(c),
            RequestKind::FreeTime(_) => None,
        }
    }

    #[inline]
    pub fn as_free_time(&self) -> Option<&FreeTimeRequest> {
        match &self.kind {
            RequestKind::FreeTime(f) => Some(f),
            RequestKind::Course(_) => None,
        }
    }

    #[inline]
    pub fn is_free_time(&self) -> bool {
        matches!(self.kind, RequestKind::FreeTime(_))
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            RequestKind::Course(c) => write!(
                f,
                "CourseRequest({}, {} course(s){})",
                self.id,
                c.courses.len(),
                if c.alternative { ", alternative" } else { "" }
            ),
            RequestKind::FreeTime(t) => write!(f, "FreeTimeRequest({}, {})", self.id, t.time),
        }
    }
}

/// A student and their ordered request list.
///
/// # Examples
///
/// ```rust
/// # use docket_model::request::Student;
/// # use docket_model::index::CourseIndex;
/// # use docket_model::time::TimePattern;
/// let mut student = Student::new(42);
/// let math = student.add_course_request(1, vec![CourseIndex::new(0)]).unwrap();
/// let lunch = student.add_free_time_request(2, TimePattern::new(0b11111, 144, 12).unwrap());
/// assert_eq!(student.num_requests(), 2);
/// assert!(student.request(lunch).is_free_time());
/// assert!(!student.request(math).is_free_time());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Student {
    id: u64,
    requests: Vec<Request>,
}

impl Student {
    #[inline]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            requests: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    #[inline]
    pub fn num_requests(&self) -> usize {
        self.requests.len()
    }

    /// Returns the request at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_requests()`.
    #[inline]
    pub fn request(&self, index: RequestIndex) -> &Request {
        debug_assert!(
            index.get() < self.requests.len(),
            "called `Student::request` with request index out of bounds: the len is {} but the index is {}",
            self.requests.len(),
            index.get()
        );
        &self.requests[index.get()]
    }

    #[inline]
    pub fn get_request(&self, index: RequestIndex) -> Option<&Request> {
        self.requests.get(index.get())
    }

    fn push(&mut self, id: u64, kind: RequestKind) -> RequestIndex {
        let index = RequestIndex::new(self.requests.len());
        self.requests.push(Request { id, kind });
        index
    }

    /// Appends a primary course request.
    pub fn add_course_request(
        &mut self,
        id: u64,
        courses: Vec<CourseIndex>,
    ) -> Result<RequestIndex, ModelError> {
        self.add_course_request_with(id, courses, false)
    }

    /// Appends a backup course request taken from the alternatives list.
    pub fn add_alternative_course_request(
        &mut self,
        id: u64,
        courses: Vec<CourseIndex>,
    ) -> Result<RequestIndex, ModelError> {
        self.add_course_request_with(id, courses, true)
    }

    fn add_course_request_with(
        &mut self,
        id: u64,
        courses: Vec<CourseIndex>,
        alternative: bool,
    ) -> Result<RequestIndex, ModelError> {
        if courses.is_empty() {
            return Err(ModelError::EmptyCourseRequest { request_id: id });
        }
        Ok(self.push(
            id,
            RequestKind::Course(CourseRequest {
                courses,
                alternative,
            }),
        ))
    }

    /// Appends a free-time request.
    pub fn add_free_time_request(&mut self, id: u64, time: TimePattern) -> RequestIndex {
        self.push(id, RequestKind::FreeTime(FreeTimeRequest { time }))
    }

    /// Checks that every requested course exists in `model`.
    pub fn validate(&self, model: &SchedulingModel) -> Result<(), ModelError> {
        let unknown = self
            .requests
            .iter()
            .filter_map(Request::as_course)
            .flat_map(|c| c.courses.iter().copied())
            .find(|c| c.get() >= model.num_courses());
        match unknown {
            Some(course) => Err(ModelError::UnknownCourse(course)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    #[test]
    fn test_empty_course_request_is_rejected() {
        let mut s = Student::new(1);
        assert_eq!(
            s.add_course_request(7, Vec::new()),
            Err(ModelError::EmptyCourseRequest { request_id: 7 })
        );
        assert_eq!(s.num_requests(), 0);
    }

    #[test]
    fn test_request_kinds_and_alternatives() {
        let mut s = Student::new(1);
        let a = s.add_course_request(1, vec![CourseIndex::new(0)]).unwrap();
        let b = s
            .add_alternative_course_request(2, vec![CourseIndex::new(1), CourseIndex::new(2)])
            .unwrap();
        let c = s.add_free_time_request(3, TimePattern::new(0b1, 100, 6).unwrap());

        assert!(!s.request(a).as_course().unwrap().is_alternative());
        assert!(s.request(b).as_course().unwrap().is_alternative());
        assert!(s.request(b).as_course().unwrap().contains_course(CourseIndex::new(2)));
        assert!(s.request(c).as_free_time().is_some());
        assert!(s.request(c).as_course().is_none());
        assert_eq!(s.get_request(RequestIndex::new(3)), None);
    }

    #[test]
    fn test_validate_detects_unknown_course() {
        let mut b = ModelBuilder::new();
        let c = b.add_course(1, "A");
        let sp = b.add_subpart(c, 1, "Lec", None).unwrap();
        b.add_section(sp, 1, "1").unwrap();
        let model = b.build().unwrap();

        let mut s = Student::new(1);
        s.add_course_request(1, vec![c]).unwrap();
        assert!(s.validate(&model).is_ok());
        s.add_course_request(2, vec![CourseIndex::new(5)]).unwrap();
        assert_eq!(
            s.validate(&model),
            Err(ModelError::UnknownCourse(CourseIndex::new(5)))
        );
    }
}
