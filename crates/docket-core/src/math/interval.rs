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

use num_traits::PrimInt;
use std::cmp::{max, min};

/// A half-open interval `[start, end)` over integer slots.
///
/// Meeting times are expressed as slot ranges within a day; two meetings
/// collide exactly when their intervals intersect, and the travel time
/// available between them is the length of the gap separating them.
///
/// # Invariants
/// `start_inclusive <= end_exclusive`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedOpenInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `start_inclusive > end_exclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use docket_core::math::interval::ClosedOpenInterval;
    /// let iv = ClosedOpenInterval::new(96u16, 106);
    /// assert_eq!(iv.len(), 10);
    /// ```
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates a new `ClosedOpenInterval`, checking the invariant only in
    /// debug builds.
    #[inline]
    pub fn new_unchecked(start_inclusive: T, end_exclusive: T) -> Self {
        debug_assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Returns the inclusive start bound.
    #[inline]
    pub const fn start(&self) -> T {
        self.start_inclusive
    }

    /// Returns the exclusive end bound.
    #[inline]
    pub const fn end(&self) -> T {
        self.end_exclusive
    }

    /// Returns `end - start`.
    #[inline]
    pub fn len(&self) -> T {
        self.end_exclusive - self.start_inclusive
    }

    /// Returns `true` if `start == end`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }

    /// Returns `true` if the intervals share at least one slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use docket_core::math::interval::ClosedOpenInterval;
    /// let a = ClosedOpenInterval::new(0, 10);
    /// assert!(a.intersects(ClosedOpenInterval::new(5, 15)));
    /// assert!(!a.intersects(ClosedOpenInterval::new(10, 20)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }

    /// Returns the shared part of both intervals, or `None` if they do not
    /// intersect.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use docket_core::math::interval::ClosedOpenInterval;
    /// let a = ClosedOpenInterval::new(0, 10);
    /// let b = ClosedOpenInterval::new(5, 15);
    /// assert_eq!(a.intersection(b), Some(ClosedOpenInterval::new(5, 10)));
    /// ```
    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let new_start = max(self.start_inclusive, other.start_inclusive);
        let new_end = min(self.end_exclusive, other.end_exclusive);

        if new_start < new_end {
            Some(Self::new_unchecked(new_start, new_end))
        } else {
            None
        }
    }

    /// Returns the number of shared slots, zero when disjoint.
    #[inline]
    pub fn overlap_len(&self, other: Self) -> T {
        self.intersection(other)
            .map(|iv| iv.len())
            .unwrap_or_else(T::zero)
    }

    /// Returns the interval strictly between two disjoint intervals.
    ///
    /// Returns `None` if the intervals intersect or touch.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use docket_core::math::interval::ClosedOpenInterval;
    /// let a = ClosedOpenInterval::new(0, 5);
    /// let b = ClosedOpenInterval::new(10, 15);
    /// assert_eq!(a.gap(b), Some(ClosedOpenInterval::new(5, 10)));
    /// assert_eq!(b.gap(a), Some(ClosedOpenInterval::new(5, 10)));
    /// ```
    #[inline]
    pub fn gap(&self, other: Self) -> Option<Self> {
        if self.end_exclusive < other.start_inclusive {
            Some(Self::new_unchecked(
                self.end_exclusive,
                other.start_inclusive,
            ))
        } else if other.end_exclusive < self.start_inclusive {
            Some(Self::new_unchecked(
                other.end_exclusive,
                self.start_inclusive,
            ))
        } else {
            None
        }
    }

    /// Returns the number of slots separating the intervals, zero when they
    /// intersect or touch.
    #[inline]
    pub fn gap_len(&self, other: Self) -> T {
        self.gap(other).map(|iv| iv.len()).unwrap_or_else(T::zero)
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosedOpenInterval")
            .field("start_inclusive", &self.start_inclusive)
            .field("end_exclusive", &self.end_exclusive)
            .finish()
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_valid() {
        let iv = ClosedOpenInterval::new(10u16, 20);
        assert_eq!(iv.start(), 10);
        assert_eq!(iv.end(), 20);
        assert_eq!(iv.len(), 10);
        assert!(!iv.is_empty());
    }

    #[test]
    #[should_panic(expected = "Invalid interval")]
    fn test_new_panic() {
        ClosedOpenInterval::new(10, 5);
    }

    #[test]
    fn test_intersects_excludes_touching_intervals() {
        let a = ClosedOpenInterval::new(0, 10);
        assert!(a.intersects(ClosedOpenInterval::new(9, 12)));
        assert!(a.intersects(ClosedOpenInterval::new(2, 3)));
        assert!(!a.intersects(ClosedOpenInterval::new(10, 12)));
        assert!(!a.intersects(ClosedOpenInterval::new(-4, 0)));
    }

    #[test]
    fn test_overlap_len() {
        let a = ClosedOpenInterval::new(0u32, 10);
        assert_eq!(a.overlap_len(ClosedOpenInterval::new(5, 15)), 5);
        assert_eq!(a.overlap_len(ClosedOpenInterval::new(2, 4)), 2);
        assert_eq!(a.overlap_len(ClosedOpenInterval::new(10, 15)), 0);
        assert_eq!(a.overlap_len(a), 10);
    }

    #[test]
    fn test_gap_is_symmetric_and_none_on_contact() {
        let a = ClosedOpenInterval::new(0, 5);
        let b = ClosedOpenInterval::new(8, 9);
        assert_eq!(a.gap(b), b.gap(a));
        assert_eq!(a.gap_len(b), 3);
        assert_eq!(a.gap(ClosedOpenInterval::new(5, 7)), None);
        assert_eq!(a.gap_len(ClosedOpenInterval::new(3, 7)), 0);
    }

    #[test]
    fn test_display() {
        let iv = ClosedOpenInterval::new(96u16, 106);
        assert_eq!(format!("{}", iv), "[96, 106)");
        assert!(ClosedOpenInterval::new(7, 7).is_empty());
    }
}
