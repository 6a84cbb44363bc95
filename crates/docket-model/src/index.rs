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

use docket_core::utils::index::{TypedIndex, TypedIndexTag};

/// A tag type for request indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RequestIndexTag;

impl TypedIndexTag for RequestIndexTag {
    const NAME: &'static str = "RequestIndex";
}

/// A typed index for a student's requests (position in `Student::requests`).
pub type RequestIndex = TypedIndex<RequestIndexTag>;

/// A tag type for course indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CourseIndexTag;

impl TypedIndexTag for CourseIndexTag {
    const NAME: &'static str = "CourseIndex";
}

/// A typed index for courses of the catalogue.
pub type CourseIndex = TypedIndex<CourseIndexTag>;

/// A tag type for subpart indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SubpartIndexTag;

impl TypedIndexTag for SubpartIndexTag {
    const NAME: &'static str = "SubpartIndex";
}

/// A typed index for subparts (lecture, lab, ...) of the catalogue.
pub type SubpartIndex = TypedIndex<SubpartIndexTag>;

/// A tag type for section indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SectionIndexTag;

impl TypedIndexTag for SectionIndexTag {
    const NAME: &'static str = "SectionIndex";
}

/// A typed index for sections of the catalogue.
pub type SectionIndex = TypedIndex<SectionIndexTag>;
