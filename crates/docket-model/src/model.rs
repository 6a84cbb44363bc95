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
    error::ModelError,
    index::{CourseIndex, SectionIndex, SubpartIndex},
    location::Location,
    time::TimePattern,
};

/// A schedulable class: one meeting pattern in one room with a seat limit.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    id: u64,
    name: String,
    subpart: SubpartIndex,
    parent: Option<SectionIndex>,
    time: Option<TimePattern>,
    location: Option<Location>,
    limit: Option<u32>,
    enrolled: u32,
    allow_overlap: bool,
}

impl Section {
    /// Returns the external identifier of the section.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn subpart(&self) -> SubpartIndex {
        self.subpart
    }

    /// Returns the section of the parent subpart this section is bound to.
    #[inline]
    pub fn parent(&self) -> Option<SectionIndex> {
        self.parent
    }

    /// Returns the meeting pattern, or `None` for arranged hours.
    #[inline]
    pub fn time(&self) -> Option<&TimePattern> {
        self.time.as_ref()
    }

    #[inline]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Returns the enrollment limit, or `None` if unlimited.
    #[inline]
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Returns the number of seats taken by other students when the call
    /// started.
    #[inline]
    pub fn enrolled(&self) -> u32 {
        self.enrolled
    }

    /// Returns `true` if time overlaps with this section are tolerated.
    #[inline]
    pub fn allow_overlap(&self) -> bool {
        self.allow_overlap
    }

    /// Returns the number of seats still open, `None` if unlimited.
    #[inline]
    pub fn available(&self) -> Option<u32> {
        self.limit.map(|l| l.saturating_sub(self.enrolled))
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Section({} '{}'", self.id, self.name)?;
        if let Some(t) = &self.time {
            write!(f, ", {}", t)?;
        }
        write!(f, ")")
    }
}

/// An instructional component of a course (lecture, lab, recitation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subpart {
    id: u64,
    name: String,
    course: CourseIndex,
    parent: Option<SubpartIndex>,
    sections: Vec<SectionIndex>,
}

impl Subpart {
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn course(&self) -> CourseIndex {
        self.course
    }

    #[inline]
    pub fn parent(&self) -> Option<SubpartIndex> {
        self.parent
    }

    #[inline]
    pub fn sections(&self) -> &[SectionIndex] {
        &self.sections
    }
}

/// An offering a student can request, composed of subparts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Course {
    id: u64,
    name: String,
    subparts: Vec<SubpartIndex>,
}

impl Course {
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the subparts in declaration order. Parents precede children.
    #[inline]
    pub fn subparts(&self) -> &[SubpartIndex] {
        &self.subparts
    }
}

/// The immutable catalogue a suggestion run works against.
///
/// Built once per call through `ModelBuilder`; all capacity data is a
/// snapshot taken at that time.
#[derive(Clone, Debug)]
pub struct SchedulingModel {
    courses: Vec<Course>,
    subparts: Vec<Subpart>,
    sections: Vec<Section>,
}

impl SchedulingModel {
    #[inline]
    pub fn num_courses(&self) -> usize {
        self.courses.len()
    }

    #[inline]
    pub fn num_subparts(&self) -> usize {
        self.subparts.len()
    }

    #[inline]
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Returns the course at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_courses()`.
    #[inline]
    pub fn course(&self, index: CourseIndex) -> &Course {
        debug_assert!(
            index.get() < self.courses.len(),
            "called `SchedulingModel::course` with course index out of bounds: the len is {} but the index is {}",
            self.courses.len(),
            index.get()
        );
        &self.courses[index.get()]
    }

    /// Returns the subpart at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_subparts()`.
    #[inline]
    pub fn subpart(&self, index: SubpartIndex) -> &Subpart {
        debug_assert!(
            index.get() < self.subparts.len(),
            "called `SchedulingModel::subpart` with subpart index out of bounds: the len is {} but the index is {}",
            self.subparts.len(),
            index.get()
        );
        &self.subparts[index.get()]
    }

    /// Returns the section at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_sections()`.
    #[inline]
    pub fn section(&self, index: SectionIndex) -> &Section {
        debug_assert!(
            index.get() < self.sections.len(),
            "called `SchedulingModel::section` with section index out of bounds: the len is {} but the index is {}",
            self.sections.len(),
            index.get()
        );
        &self.sections[index.get()]
    }

    /// Returns the section at `index`, or `None` if out of bounds.
    #[inline]
    pub fn get_section(&self, index: SectionIndex) -> Option<&Section> {
        self.sections.get(index.get())
    }

    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the course a section belongs to.
    #[inline]
    pub fn course_of_section(&self, index: SectionIndex) -> CourseIndex {
        self.subpart(self.section(index).subpart).course
    }

    /// Returns `true` if the section belongs to the course.
    #[inline]
    pub fn course_contains_section(&self, course: CourseIndex, section: SectionIndex) -> bool {
        self.get_section(section)
            .is_some_and(|s| self.subpart(s.subpart).course == course)
    }

    /// Looks up a course by its external identifier.
    pub fn find_course(&self, id: u64) -> Option<CourseIndex> {
        self.courses
            .iter()
            .position(|c| c.id == id)
            .map(CourseIndex::new)
    }

    /// Looks up a section of `course` by its external identifier.
    pub fn find_section(&self, course: CourseIndex, id: u64) -> Option<SectionIndex> {
        self.courses.get(course.get())?.subparts.iter().find_map(|&sp| {
            self.subpart(sp)
                .sections
                .iter()
                .copied()
                .find(|&s| self.section(s).id == id)
        })
    }
}

impl std::fmt::Display for SchedulingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SchedulingModel(courses: {}, subparts: {}, sections: {})",
            self.num_courses(),
            self.num_subparts(),
            self.num_sections()
        )
    }
}

/// Assembles a `SchedulingModel`.
///
/// Courses, subparts and sections are added top-down; each `add_*` call
/// returns the index of the new element. A subpart's parent must be added
/// before it, which keeps parents ahead of children in `Course::subparts`.
/// `build` checks the structure (non-empty courses and subparts, consistent
/// parent links) and hands out the immutable model.
///
/// # Examples
///
/// ```rust
/// # use docket_model::model::ModelBuilder;
/// # use docket_model::time::TimePattern;
/// let mut builder = ModelBuilder::new();
/// let cs101 = builder.add_course(101, "CS 101");
/// let lec = builder.add_subpart(cs101, 1, "Lec", None).unwrap();
/// let s1 = builder.add_section(lec, 11, "1").unwrap();
/// builder
///     .set_section_time(s1, TimePattern::new(0b10101, 108, 10).unwrap())
///     .set_section_limit(s1, Some(30));
/// let model = builder.build().unwrap();
/// assert_eq!(model.num_sections(), 1);
/// assert_eq!(model.section(s1).limit(), Some(30));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModelBuilder {
    courses: Vec<Course>,
    subparts: Vec<Subpart>,
    sections: Vec<Section>,
}

impl ModelBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn num_courses(&self) -> usize {
        self.courses.len()
    }

    #[inline]
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Adds a course without subparts.
    pub fn add_course(&mut self, id: u64, name: impl Into<String>) -> CourseIndex {
        let index = CourseIndex::new(self.courses.len());
        self.courses.push(Course {
            id,
            name: name.into(),
            subparts: Vec::new(),
        });
        index
    }

    /// Adds a subpart to `course`, optionally nested under `parent`.
    pub fn add_subpart(
        &mut self,
        course: CourseIndex,
        id: u64,
        name: impl Into<String>,
        parent: Option<SubpartIndex>,
    ) -> Result<SubpartIndex, ModelError> {
        if course.get() >= self.courses.len() {
            return Err(ModelError::UnknownCourse(course));
        }
        let index = SubpartIndex::new(self.subparts.len());
        if let Some(p) = parent {
            let parent_subpart = self
                .subparts
                .get(p.get())
                .ok_or(ModelError::UnknownSubpart(p))?;
            if parent_subpart.course != course {
                return Err(ModelError::ForeignParentSubpart {
                    subpart: index,
                    parent: p,
                });
            }
        }
        self.subparts.push(Subpart {
            id,
            name: name.into(),
            course,
            parent,
            sections: Vec::new(),
        });
        self.courses[course.get()].subparts.push(index);
        Ok(index)
    }

    /// Adds an unlimited, unscheduled section to `subpart`.
    pub fn add_section(
        &mut self,
        subpart: SubpartIndex,
        id: u64,
        name: impl Into<String>,
    ) -> Result<SectionIndex, ModelError> {
        if subpart.get() >= self.subparts.len() {
            return Err(ModelError::UnknownSubpart(subpart));
        }
        let index = SectionIndex::new(self.sections.len());
        self.sections.push(Section {
            id,
            name: name.into(),
            subpart,
            parent: None,
            time: None,
            location: None,
            limit: None,
            enrolled: 0,
            allow_overlap: false,
        });
        self.subparts[subpart.get()].sections.push(index);
        Ok(index)
    }

    #[inline]
    fn section_mut(&mut self, index: SectionIndex, caller: &str) -> &mut Section {
        debug_assert!(
            index.get() < self.sections.len(),
            "called `ModelBuilder::{}` with section index out of bounds: the len is {} but the index is {}",
            caller,
            self.sections.len(),
            index.get()
        );
        &mut self.sections[index.get()]
    }

    /// Sets the meeting pattern of a section.
    ///
    /// # Panics
    ///
    /// Panics if `section` is not in `0..num_sections()`.
    pub fn set_section_time(&mut self, section: SectionIndex, time: TimePattern) -> &mut Self {
        self.section_mut(section, "set_section_time").time = Some(time);
        self
    }

    /// Sets the room location of a section.
    ///
    /// # Panics
    ///
    /// Panics if `section` is not in `0..num_sections()`.
    pub fn set_section_location(&mut self, section: SectionIndex, location: Location) -> &mut Self {
        self.section_mut(section, "set_section_location").location = Some(location);
        self
    }

    /// Sets the enrollment limit of a section; `None` means unlimited.
    ///
    /// # Panics
    ///
    /// Panics if `section` is not in `0..num_sections()`.
    pub fn set_section_limit(&mut self, section: SectionIndex, limit: Option<u32>) -> &mut Self {
        self.section_mut(section, "set_section_limit").limit = limit;
        self
    }

    /// Sets the number of seats other students hold in a section.
    ///
    /// # Panics
    ///
    /// Panics if `section` is not in `0..num_sections()`.
    pub fn set_section_enrolled(&mut self, section: SectionIndex, enrolled: u32) -> &mut Self {
        self.section_mut(section, "set_section_enrolled").enrolled = enrolled;
        self
    }

    /// Binds a section to a section of its subpart's parent subpart.
    ///
    /// # Panics
    ///
    /// Panics if `section` is not in `0..num_sections()`.
    pub fn set_section_parent(&mut self, section: SectionIndex, parent: SectionIndex) -> &mut Self {
        self.section_mut(section, "set_section_parent").parent = Some(parent);
        self
    }

    /// Marks a section as tolerating time overlaps.
    ///
    /// # Panics
    ///
    /// Panics if `section` is not in `0..num_sections()`.
    pub fn set_section_allow_overlap(&mut self, section: SectionIndex, allow: bool) -> &mut Self {
        self.section_mut(section, "set_section_allow_overlap")
            .allow_overlap = allow;
        self
    }

    /// Validates the catalogue and builds the `SchedulingModel`.
    pub fn build(self) -> Result<SchedulingModel, ModelError> {
        if let Some(i) = self.courses.iter().position(|c| c.subparts.is_empty()) {
            return Err(ModelError::EmptyCourse(CourseIndex::new(i)));
        }
        if let Some(i) = self.subparts.iter().position(|s| s.sections.is_empty()) {
            return Err(ModelError::EmptySubpart(SubpartIndex::new(i)));
        }

        for (i, section) in self.sections.iter().enumerate() {
            let index = SectionIndex::new(i);
            let expected_parent_subpart = self.subparts[section.subpart.get()].parent;
            match (expected_parent_subpart, section.parent) {
                (None, None) => {}
                (Some(_), None) => return Err(ModelError::MissingParentSection(index)),
                (None, Some(parent)) => {
                    return Err(ModelError::InvalidParentSection {
                        section: index,
                        parent,
                    });
                }
                (Some(parent_subpart), Some(parent)) => {
                    let actual = self
                        .sections
                        .get(parent.get())
                        .ok_or(ModelError::UnknownSection(parent))?
                        .subpart;
                    if actual != parent_subpart {
                        return Err(ModelError::InvalidParentSection {
                            section: index,
                            parent,
                        });
                    }
                }
            }
        }

        Ok(SchedulingModel {
            courses: self.courses,
            subparts: self.subparts,
            sections: self.sections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture_lab_builder() -> (ModelBuilder, SubpartIndex, SubpartIndex, SectionIndex) {
        let mut b = ModelBuilder::new();
        let c = b.add_course(1, "BIO 110");
        let lec = b.add_subpart(c, 10, "Lec", None).unwrap();
        let lab = b.add_subpart(c, 11, "Lab", Some(lec)).unwrap();
        let l1 = b.add_section(lec, 100, "1").unwrap();
        (b, lec, lab, l1)
    }

    #[test]
    fn test_build_links_sections_and_courses() {
        let (mut b, _lec, lab, l1) = lecture_lab_builder();
        let lab1 = b.add_section(lab, 101, "1A").unwrap();
        b.set_section_parent(lab1, l1).set_section_limit(lab1, Some(20));
        let model = b.build().unwrap();

        assert_eq!(model.num_courses(), 1);
        assert_eq!(model.num_sections(), 2);
        assert_eq!(model.section(lab1).parent(), Some(l1));
        assert_eq!(model.course_of_section(lab1), CourseIndex::new(0));
        assert_eq!(model.find_course(1), Some(CourseIndex::new(0)));
        assert_eq!(model.find_section(CourseIndex::new(0), 101), Some(lab1));
        assert_eq!(model.find_section(CourseIndex::new(0), 999), None);
    }

    #[test]
    fn test_child_section_without_parent_is_rejected() {
        let (mut b, _lec, lab, _l1) = lecture_lab_builder();
        let lab1 = b.add_section(lab, 101, "1A").unwrap();
        assert_eq!(b.build().unwrap_err(), ModelError::MissingParentSection(lab1));
    }

    #[test]
    fn test_parent_from_wrong_subpart_is_rejected() {
        let (mut b, _lec, lab, _l1) = lecture_lab_builder();
        let lab1 = b.add_section(lab, 101, "1A").unwrap();
        let lab2 = b.add_section(lab, 102, "1B").unwrap();
        b.set_section_parent(lab1, lab2).set_section_parent(lab2, lab1);
        assert!(matches!(
            b.build(),
            Err(ModelError::InvalidParentSection { .. })
        ));
    }

    #[test]
    fn test_empty_course_and_subpart_are_rejected() {
        let mut b = ModelBuilder::new();
        b.add_course(1, "EMPTY");
        assert_eq!(
            b.build().unwrap_err(),
            ModelError::EmptyCourse(CourseIndex::new(0))
        );

        let mut b = ModelBuilder::new();
        let c = b.add_course(1, "X");
        let sp = b.add_subpart(c, 1, "Lec", None).unwrap();
        assert_eq!(b.build().unwrap_err(), ModelError::EmptySubpart(sp));
    }

    #[test]
    fn test_parent_subpart_must_share_course() {
        let mut b = ModelBuilder::new();
        let a = b.add_course(1, "A");
        let c = b.add_course(2, "B");
        let lec = b.add_subpart(a, 1, "Lec", None).unwrap();
        assert!(matches!(
            b.add_subpart(c, 2, "Lab", Some(lec)),
            Err(ModelError::ForeignParentSubpart { .. })
        ));
        assert_eq!(
            b.add_section(SubpartIndex::new(9), 1, "x"),
            Err(ModelError::UnknownSubpart(SubpartIndex::new(9)))
        );
    }

    #[test]
    fn test_available_seats() {
        let (mut b, _lec, lab, l1) = lecture_lab_builder();
        let lab1 = b.add_section(lab, 101, "1A").unwrap();
        b.set_section_parent(lab1, l1)
            .set_section_limit(l1, Some(10))
            .set_section_enrolled(l1, 12);
        let model = b.build().unwrap();
        assert_eq!(model.section(l1).available(), Some(0));
        assert_eq!(model.section(lab1).available(), None);
    }
}
