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

//! Weekly meeting patterns.
//!
//! A day is divided into `SLOTS_PER_DAY` slots of `SLOT_MINUTES` minutes; a
//! `TimePattern` meets on every day of its day mask over the same slot range.

use crate::error::ModelError;
use docket_core::math::interval::ClosedOpenInterval;

/// Length of one time slot in minutes.
pub const SLOT_MINUTES: u32 = 5;

/// Number of slots in one day.
pub const SLOTS_PER_DAY: u16 = 288;

/// Mask covering all seven days, Monday in bit 0.
pub const ALL_DAYS: u8 = 0b0111_1111;

const DAY_NAMES: [&str; 7] = ["M", "T", "W", "Th", "F", "S", "Su"];

/// A weekly meeting pattern: a day mask plus a slot range within the day.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TimePattern {
    days: u8,
    start_slot: u16,
    length: u16,
}

impl TimePattern {
    /// Creates a new pattern.
    ///
    /// Fails if the day mask is empty or uses bits beyond Sunday, if the
    /// length is zero, or if the meeting runs past the end of the day.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use docket_model::time::TimePattern;
    /// // Tuesday 10:00 - 10:50
    /// let tue = TimePattern::new(0b10, 120, 10).unwrap();
    /// assert_eq!(tue.duration_minutes(), 50);
    /// assert!(TimePattern::new(0, 120, 10).is_err());
    /// ```
    pub fn new(days: u8, start_slot: u16, length: u16) -> Result<Self, ModelError> {
        let valid = days != 0
            && days & !ALL_DAYS == 0
            && length > 0
            && (start_slot as u32 + length as u32) <= SLOTS_PER_DAY as u32;
        if !valid {
            return Err(ModelError::InvalidTimePattern {
                days,
                start_slot,
                length,
            });
        }
        Ok(Self {
            days,
            start_slot,
            length,
        })
    }

    #[inline]
    pub fn days(&self) -> u8 {
        self.days
    }

    #[inline]
    pub fn start_slot(&self) -> u16 {
        self.start_slot
    }

    #[inline]
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Returns the exclusive end slot.
    #[inline]
    pub fn end_slot(&self) -> u16 {
        self.start_slot + self.length
    }

    /// Returns the meeting as a slot interval within a day.
    #[inline]
    pub fn slots(&self) -> ClosedOpenInterval<u16> {
        ClosedOpenInterval::new_unchecked(self.start_slot, self.end_slot())
    }

    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.length as u32 * SLOT_MINUTES
    }

    /// Returns `true` if both patterns meet on at least one common day.
    #[inline]
    pub fn shares_day(&self, other: &TimePattern) -> bool {
        self.days & other.days != 0
    }

    /// Returns the number of days both patterns meet on.
    #[inline]
    pub fn shared_days(&self, other: &TimePattern) -> u32 {
        (self.days & other.days).count_ones()
    }

    /// Returns `true` if the patterns meet at the same time on a shared day.
    #[inline]
    pub fn overlaps(&self, other: &TimePattern) -> bool {
        self.shares_day(other) && self.slots().intersects(other.slots())
    }

    /// Returns the total overlapping minutes per week.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use docket_model::time::TimePattern;
    /// let mwf = TimePattern::new(0b10101, 108, 10).unwrap(); // MWF 9:00 - 9:50
    /// let mw = TimePattern::new(0b00101, 114, 12).unwrap();  // MW 9:30 - 10:30
    /// assert_eq!(mwf.overlap_minutes(&mw), 2 * 20);
    /// ```
    #[inline]
    pub fn overlap_minutes(&self, other: &TimePattern) -> u32 {
        let shared = self.shared_days(other);
        if shared == 0 {
            return 0;
        }
        shared * self.slots().overlap_len(other.slots()) as u32 * SLOT_MINUTES
    }

    /// Returns the break in minutes between two meetings on a shared day, or
    /// `None` if the patterns share no day or overlap.
    #[inline]
    pub fn gap_minutes(&self, other: &TimePattern) -> Option<u32> {
        if !self.shares_day(other) || self.slots().intersects(other.slots()) {
            return None;
        }
        Some(self.slots().gap_len(other.slots()) as u32 * SLOT_MINUTES)
    }
}

fn write_clock(f: &mut std::fmt::Formatter<'_>, slot: u16) -> std::fmt::Result {
    let minutes = slot as u32 * SLOT_MINUTES;
    write!(f, "{:02}:{:02}", minutes / 60, minutes % 60)
}

impl std::fmt::Display for TimePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (bit, name) in DAY_NAMES.iter().enumerate() {
            if self.days & (1 << bit) != 0 {
                f.write_str(name)?;
            }
        }
        f.write_str(" ")?;
        write_clock(f, self.start_slot)?;
        f.write_str(" - ")?;
        write_clock(f, self.end_slot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(days: u8, start: u16, len: u16) -> TimePattern {
        TimePattern::new(days, start, len).unwrap()
    }

    #[test]
    fn test_rejects_invalid_patterns() {
        assert!(TimePattern::new(0, 10, 10).is_err());
        assert!(TimePattern::new(0b1000_0000, 10, 10).is_err());
        assert!(TimePattern::new(0b1, 10, 0).is_err());
        assert!(TimePattern::new(0b1, 280, 9).is_err());
        assert!(TimePattern::new(0b1, 280, 8).is_ok());
    }

    #[test]
    fn test_overlap_requires_shared_day() {
        let mon = tp(0b001, 100, 12);
        let tue = tp(0b010, 100, 12);
        assert!(!mon.overlaps(&tue));
        assert_eq!(mon.overlap_minutes(&tue), 0);
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = tp(0b0110, 100, 12);
        let b = tp(0b0011, 106, 12);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert_eq!(a.overlap_minutes(&b), b.overlap_minutes(&a));
        assert_eq!(a.overlap_minutes(&b), 30);
    }

    #[test]
    fn test_back_to_back_meetings_do_not_overlap() {
        let a = tp(0b1, 100, 10);
        let b = tp(0b1, 110, 10);
        assert!(!a.overlaps(&b));
        assert_eq!(a.gap_minutes(&b), Some(0));
    }

    #[test]
    fn test_gap_minutes() {
        let a = tp(0b1, 100, 10);
        let b = tp(0b1, 112, 10);
        assert_eq!(a.gap_minutes(&b), Some(10));
        assert_eq!(b.gap_minutes(&a), Some(10));
        assert_eq!(a.gap_minutes(&tp(0b10, 112, 10)), None);
        assert_eq!(a.gap_minutes(&tp(0b1, 105, 10)), None);
    }

    #[test]
    fn test_display() {
        let p = tp(0b10101, 108, 10);
        assert_eq!(format!("{}", p), "MWF 09:00 - 09:50");
        let p = tp(0b1010, 156, 15);
        assert_eq!(format!("{}", p), "TTh 13:00 - 14:15");
    }
}
