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

//! Enumeration of the values a request can take.
//!
//! For a course request every alternative course is expanded, in request
//! order, into all combinations of one section per subpart that respect the
//! parent/child section links and contain no hard time conflict. Penalties
//! that arise inside a single enrollment (tolerated overlaps, tight walks
//! between two of its sections) are computed once here. A free-time request
//! has exactly one candidate: the free time itself.
//!
//! The number of combinations is the product of the subpart sizes, so the
//! enumeration polls the search deadline and gives up once it has passed.

use crate::{conflict, governor::TimeoutGovernor};
use docket_model::{
    enrollment::{Enrollment, SectionList},
    index::{CourseIndex, RequestIndex, SectionIndex},
    location::DistanceMetric,
    model::SchedulingModel,
    request::{RequestKind, Student},
    suggestion::PenaltyCounts,
};

/// One enumerated value of a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    enrollment: Enrollment,
    internal: PenaltyCounts,
}

impl Candidate {
    #[inline]
    pub fn enrollment(&self) -> &Enrollment {
        &self.enrollment
    }

    #[inline]
    pub fn sections(&self) -> &[SectionIndex] {
        self.enrollment.sections()
    }

    /// Returns the penalties arising between this candidate's own sections.
    #[inline]
    pub fn internal_penalties(&self) -> &PenaltyCounts {
        &self.internal
    }
}

/// All candidates of all requests of one student.
#[derive(Clone, Debug, Default)]
pub struct CandidateCatalog {
    per_request: Vec<Vec<Candidate>>,
}

impl CandidateCatalog {
    /// Enumerates the candidates of every request of `student`.
    pub fn build(model: &SchedulingModel, student: &Student, metric: &DistanceMetric) -> Self {
        Self::build_within(model, student, metric, &mut TimeoutGovernor::unbounded())
            .unwrap_or_default()
    }

    /// Enumerates the candidates of every request of `student`, or returns
    /// `None` if `governor` expires first.
    pub fn build_within(
        model: &SchedulingModel,
        student: &Student,
        metric: &DistanceMetric,
        governor: &mut TimeoutGovernor,
    ) -> Option<Self> {
        let mut per_request = Vec::with_capacity(student.num_requests());
        for (i, request) in student.requests().iter().enumerate() {
            let index = RequestIndex::new(i);
            let candidates = match request.kind() {
                RequestKind::FreeTime(_) => vec![Candidate {
                    enrollment: Enrollment::free_time(index),
                    internal: PenaltyCounts::default(),
                }],
                RequestKind::Course(c) => {
                    let mut out = Vec::new();
                    for &course in c.courses() {
                        let mut walk = Enumeration {
                            model,
                            metric,
                            request: index,
                            course,
                            governor: &mut *governor,
                            out: &mut out,
                        };
                        if !walk.run() {
                            return None;
                        }
                    }
                    out
                }
            };
            per_request.push(candidates);
        }
        Some(Self { per_request })
    }

    #[inline]
    pub fn num_requests(&self) -> usize {
        self.per_request.len()
    }

    /// Returns the candidates of `request` in enumeration order.
    #[inline]
    pub fn candidates(&self, request: RequestIndex) -> &[Candidate] {
        debug_assert!(
            request.get() < self.per_request.len(),
            "called `CandidateCatalog::candidates` with request index out of bounds: the len is {} but the index is {}",
            self.per_request.len(),
            request.get()
        );
        &self.per_request[request.get()]
    }

    /// Returns a single candidate.
    #[inline]
    pub fn candidate(&self, request: RequestIndex, index: u32) -> &Candidate {
        &self.candidates(request)[index as usize]
    }

    /// Returns the total number of candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.per_request.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.per_request.iter().all(Vec::is_empty)
    }
}

/// Depth-first walk over the subparts of one course.
struct Enumeration<'a, 'g> {
    model: &'a SchedulingModel,
    metric: &'a DistanceMetric,
    request: RequestIndex,
    course: CourseIndex,
    governor: &'g mut TimeoutGovernor,
    out: &'g mut Vec<Candidate>,
}

impl Enumeration<'_, '_> {
    /// Appends every combination of the course. Returns `false` if the
    /// deadline passed before the walk completed.
    fn run(&mut self) -> bool {
        let subparts = self.model.course(self.course).subparts().len();
        let mut chosen = SectionList::with_capacity(subparts);
        self.extend(0, &mut chosen)
    }

    /// Subparts are ordered parents first, so the parent section of any
    /// subpart is already in `chosen`.
    fn extend(&mut self, level: usize, chosen: &mut SectionList) -> bool {
        if self.governor.poll() {
            return false;
        }

        let model = self.model;
        let subparts = model.course(self.course).subparts();
        if level == subparts.len() {
            self.out.push(Candidate {
                enrollment: Enrollment::course(self.request, self.course, chosen.clone()),
                internal: internal_penalties(model, self.metric, chosen),
            });
            return true;
        }

        for &section_index in model.subpart(subparts[level]).sections() {
            let section = model.section(section_index);
            if let Some(parent) = section.parent()
                && !chosen.contains(&parent)
            {
                continue;
            }
            let clashes = chosen
                .iter()
                .any(|&other| conflict::hard_time_conflict(section, model.section(other)));
            if clashes {
                continue;
            }
            chosen.push(section_index);
            let completed = self.extend(level + 1, chosen);
            chosen.pop();
            if !completed {
                return false;
            }
        }
        true
    }
}

fn internal_penalties(
    model: &SchedulingModel,
    metric: &DistanceMetric,
    sections: &[SectionIndex],
) -> PenaltyCounts {
    let mut counts = PenaltyCounts::default();
    for (i, &a) in sections.iter().enumerate() {
        for &b in &sections[i + 1..] {
            let (sa, sb) = (model.section(a), model.section(b));
            counts.overlap_minutes += conflict::section_overlap_minutes(sa, sb);
            if conflict::distance_conflict(sa, sb, metric) {
                counts.distance_conflicts += 1;
            }
        }
    }
    counts
}
