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

use crate::index::{CourseIndex, RequestIndex, SectionIndex};
use smallvec::SmallVec;

/// The sections of one course enrollment, one per subpart in subpart order.
pub type SectionList = SmallVec<[SectionIndex; 4]>;

/// A concrete value for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Enrollment {
    /// A course request enrolled into `course` with one section per subpart.
    Course {
        request: RequestIndex,
        course: CourseIndex,
        sections: SectionList,
    },
    /// A free-time request that is kept.
    FreeTime { request: RequestIndex },
}

impl Enrollment {
    #[inline]
    pub fn course(request: RequestIndex, course: CourseIndex, sections: SectionList) -> Self {
        Enrollment::Course {
            request,
            course,
            sections,
        }
    }

    #[inline]
    pub fn free_time(request: RequestIndex) -> Self {
        Enrollment::FreeTime { request }
    }

    #[inline]
    pub fn request(&self) -> RequestIndex {
        match self {
            Enrollment::Course { request, .. } | Enrollment::FreeTime { request } => *request,
        }
    }

    /// Returns the enrolled course, `None` for a free time.
    #[inline]
    pub fn course_index(&self) -> Option<CourseIndex> {
        match self {
            Enrollment::Course { course, .. } => Some(*course),
            Enrollment::FreeTime { .. } => None,
        }
    }

    /// Returns the enrolled sections; empty for a free time.
    #[inline]
    pub fn sections(&self) -> &[SectionIndex] {
        match self {
            Enrollment::Course { sections, .. } => sections.as_slice(),
            Enrollment::FreeTime { .. } => &[],
        }
    }

    #[inline]
    pub fn contains_section(&self, section: SectionIndex) -> bool {
        self.sections().contains(&section)
    }

    #[inline]
    pub fn is_free_time(&self) -> bool {
        matches!(self, Enrollment::FreeTime { .. })
    }
}

impl std::fmt::Display for Enrollment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Enrollment::Course {
                request,
                course,
                sections,
            } => {
                write!(f, "{} -> {} [", request, course)?;
                for (i, s) in sections.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", s.get())?;
                }
                write!(f, "]")
            }
            Enrollment::FreeTime { request } => write!(f, "{} -> free time", request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_accessors() {
        let e = Enrollment::course(
            RequestIndex::new(2),
            CourseIndex::new(1),
            smallvec![SectionIndex::new(4), SectionIndex::new(7)],
        );
        assert_eq!(e.request(), RequestIndex::new(2));
        assert_eq!(e.course_index(), Some(CourseIndex::new(1)));
        assert!(e.contains_section(SectionIndex::new(7)));
        assert!(!e.contains_section(SectionIndex::new(5)));
        assert!(!e.is_free_time());

        let ft = Enrollment::free_time(RequestIndex::new(0));
        assert!(ft.is_free_time());
        assert!(ft.sections().is_empty());
        assert_eq!(ft.course_index(), None);
    }

    #[test]
    fn test_display() {
        let e = Enrollment::course(
            RequestIndex::new(0),
            CourseIndex::new(3),
            smallvec![SectionIndex::new(1), SectionIndex::new(2)],
        );
        assert_eq!(format!("{}", e), "RequestIndex(0) -> CourseIndex(3) [1, 2]");
    }
}
