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

use crate::index::{CourseIndex, SectionIndex, SubpartIndex};

/// Errors raised while assembling a `SchedulingModel` or a `Student`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A course index does not refer to a course of the catalogue.
    UnknownCourse(CourseIndex),
    /// A subpart index does not refer to a subpart of the catalogue.
    UnknownSubpart(SubpartIndex),
    /// A section index does not refer to a section of the catalogue.
    UnknownSection(SectionIndex),
    /// A subpart names a parent subpart of a different course.
    ForeignParentSubpart {
        subpart: SubpartIndex,
        parent: SubpartIndex,
    },
    /// A section of a child subpart has no parent section.
    MissingParentSection(SectionIndex),
    /// A section names a parent that is not a section of its subpart's parent.
    InvalidParentSection {
        section: SectionIndex,
        parent: SectionIndex,
    },
    /// A course was declared without any subparts.
    EmptyCourse(CourseIndex),
    /// A subpart was declared without any sections.
    EmptySubpart(SubpartIndex),
    /// A course request lists no courses.
    EmptyCourseRequest { request_id: u64 },
    /// A time pattern with an empty day mask, zero length or running past
    /// the end of the day.
    InvalidTimePattern {
        days: u8,
        start_slot: u16,
        length: u16,
    },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCourse(c) => write!(f, "Unknown course {}", c),
            Self::UnknownSubpart(s) => write!(f, "Unknown subpart {}", s),
            Self::UnknownSection(s) => write!(f, "Unknown section {}", s),
            Self::ForeignParentSubpart { subpart, parent } => write!(
                f,
                "Subpart {} cannot have parent {} from a different course",
                subpart, parent
            ),
            Self::MissingParentSection(s) => {
                write!(f, "Section {} belongs to a child subpart but has no parent", s)
            }
            Self::InvalidParentSection { section, parent } => write!(
                f,
                "Section {} cannot have parent {}: not a section of the parent subpart",
                section, parent
            ),
            Self::EmptyCourse(c) => write!(f, "Course {} has no subparts", c),
            Self::EmptySubpart(s) => write!(f, "Subpart {} has no sections", s),
            Self::EmptyCourseRequest { request_id } => {
                write!(f, "Course request {} lists no courses", request_id)
            }
            Self::InvalidTimePattern {
                days,
                start_slot,
                length,
            } => write!(
                f,
                "Invalid time pattern (days: {:#09b}, start slot: {}, length: {})",
                days, start_slot, length
            ),
        }
    }
}

impl std::error::Error for ModelError {}
