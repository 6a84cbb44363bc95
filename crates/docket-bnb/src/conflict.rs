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

//! Pairwise conflict detection.
//!
//! Pure functions over catalogue data. A section without a meeting time or
//! without a room never conflicts on time or distance respectively.

use docket_model::{location::DistanceMetric, model::Section, request::FreeTimeRequest};

/// Returns `true` if the two sections meet at the same time on a shared day.
#[inline]
pub fn time_conflict(a: &Section, b: &Section) -> bool {
    match (a.time(), b.time()) {
        (Some(ta), Some(tb)) => ta.overlaps(tb),
        _ => false,
    }
}

/// Returns `true` if the section meets during the free time.
#[inline]
pub fn free_time_conflict(section: &Section, free_time: &FreeTimeRequest) -> bool {
    section
        .time()
        .is_some_and(|t| t.overlaps(free_time.time()))
}

/// Returns `true` if the sections overlap and neither tolerates overlaps.
#[inline]
pub fn hard_time_conflict(a: &Section, b: &Section) -> bool {
    !(a.allow_overlap() || b.allow_overlap()) && time_conflict(a, b)
}

/// Returns the overlapping minutes per week of two sections.
#[inline]
pub fn section_overlap_minutes(a: &Section, b: &Section) -> u32 {
    match (a.time(), b.time()) {
        (Some(ta), Some(tb)) => ta.overlap_minutes(tb),
        _ => 0,
    }
}

/// Returns the minutes per week a section eats into a free time.
#[inline]
pub fn free_time_overlap_minutes(section: &Section, free_time: &FreeTimeRequest) -> u32 {
    section
        .time()
        .map_or(0, |t| t.overlap_minutes(free_time.time()))
}

/// Returns `true` if the student cannot make it from one section to the
/// other: they meet on a shared day with a break shorter than the metric's
/// threshold, in rooms farther apart than its tolerance.
#[inline]
pub fn distance_conflict(a: &Section, b: &Section, metric: &DistanceMetric) -> bool {
    let (Some(ta), Some(tb)) = (a.time(), b.time()) else {
        return false;
    };
    let (Some(la), Some(lb)) = (a.location(), b.location()) else {
        return false;
    };
    match ta.gap_minutes(tb) {
        Some(gap) if gap < metric.max_gap_minutes() => metric.too_far(la, lb),
        _ => false,
    }
}

/// Returns `true` if one more seat fits into the section, given the seats
/// already consumed.
#[inline]
pub fn capacity_ok(section: &Section, consumed: u32, allow_over_limit: bool) -> bool {
    allow_over_limit || section.limit().is_none_or(|limit| consumed < limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_model::{
        index::SectionIndex,
        location::{Ellipsoid, Location},
        model::{ModelBuilder, SchedulingModel},
        request::Student,
        time::TimePattern,
    };

    fn tp(days: u8, start: u16, len: u16) -> TimePattern {
        TimePattern::new(days, start, len).unwrap()
    }

    /// Five sections of one subpart:
    /// 0: Tue 10:00-10:50 @ (0,0)
    /// 1: Tue 10:30-11:20 @ (0,0)
    /// 2: Tue 10:55-11:45 @ (100,0)
    /// 3: Tue 10:30-11:20, overlap allowed, limit 0
    /// 4: no time, limit 2 with 1 enrolled
    fn model() -> SchedulingModel {
        let mut b = ModelBuilder::new();
        let c = b.add_course(1, "C");
        let sp = b.add_subpart(c, 1, "Lec", None).unwrap();
        let s: Vec<SectionIndex> = (0..5)
            .map(|i| b.add_section(sp, i, format!("{}", i)).unwrap())
            .collect();
        b.set_section_time(s[0], tp(0b10, 120, 10))
            .set_section_location(s[0], Location::new(0.0, 0.0));
        b.set_section_time(s[1], tp(0b10, 126, 10))
            .set_section_location(s[1], Location::new(0.0, 0.0));
        b.set_section_time(s[2], tp(0b10, 131, 10))
            .set_section_location(s[2], Location::new(100.0, 0.0));
        b.set_section_time(s[3], tp(0b10, 126, 10))
            .set_section_allow_overlap(s[3], true)
            .set_section_limit(s[3], Some(0));
        b.set_section_limit(s[4], Some(2))
            .set_section_enrolled(s[4], 1);
        b.build().unwrap()
    }

    fn sec(m: &SchedulingModel, i: usize) -> &Section {
        m.section(SectionIndex::new(i))
    }

    #[test]
    fn test_time_conflict_is_symmetric() {
        let m = model();
        assert!(time_conflict(sec(&m, 0), sec(&m, 1)));
        assert!(time_conflict(sec(&m, 1), sec(&m, 0)));
        assert!(!time_conflict(sec(&m, 0), sec(&m, 2)));
        assert!(!time_conflict(sec(&m, 0), sec(&m, 4)));
    }

    #[test]
    fn test_allow_overlap_softens_conflict() {
        let m = model();
        assert!(time_conflict(sec(&m, 0), sec(&m, 3)));
        assert!(!hard_time_conflict(sec(&m, 0), sec(&m, 3)));
        assert!(hard_time_conflict(sec(&m, 0), sec(&m, 1)));
        assert_eq!(section_overlap_minutes(sec(&m, 0), sec(&m, 3)), 20);
    }

    #[test]
    fn test_free_time_overlap() {
        let m = model();
        let mut student = Student::new(1);
        let r = student.add_free_time_request(1, tp(0b110, 128, 12));
        let ft = student.request(r).as_free_time().unwrap();
        assert!(free_time_conflict(sec(&m, 0), ft));
        assert_eq!(free_time_overlap_minutes(sec(&m, 0), ft), 10);
        assert_eq!(free_time_overlap_minutes(sec(&m, 4), ft), 0);
    }

    #[test]
    fn test_distance_conflict_needs_short_break_and_far_rooms() {
        let m = model();
        let metric = DistanceMetric::new(Ellipsoid::Legacy, 0.0, 10);
        // 0 ends 10:50, 2 starts 10:55 in a room 1000m away.
        assert!(distance_conflict(sec(&m, 0), sec(&m, 2), &metric));
        assert!(distance_conflict(sec(&m, 2), sec(&m, 0), &metric));
        // Same room.
        assert!(!distance_conflict(sec(&m, 0), sec(&m, 1), &metric));
        // Long enough break.
        let relaxed = DistanceMetric::new(Ellipsoid::Legacy, 0.0, 5);
        assert!(!distance_conflict(sec(&m, 0), sec(&m, 2), &relaxed));
        // Close enough rooms.
        let tolerant = DistanceMetric::new(Ellipsoid::Legacy, 2000.0, 10);
        assert!(!distance_conflict(sec(&m, 0), sec(&m, 2), &tolerant));
        // No location.
        assert!(!distance_conflict(sec(&m, 0), sec(&m, 3), &metric));
    }

    #[test]
    fn test_capacity() {
        let m = model();
        assert!(!capacity_ok(sec(&m, 3), 0, false));
        assert!(capacity_ok(sec(&m, 3), 0, true));
        assert!(capacity_ok(sec(&m, 4), 1, false));
        assert!(!capacity_ok(sec(&m, 4), 2, false));
        assert!(capacity_ok(sec(&m, 0), 1_000, false));
    }
}
