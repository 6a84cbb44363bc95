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

use std::ops::{Add, AddAssign};

/// A non-negative, totally ordered suggestion cost.
///
/// Wraps an `f64` and orders it with `f64::total_cmp`, so costs can be used
/// directly as sort keys. Costs are built by adding non-negative penalty
/// terms; `Cost::INFINITY` is the bound of a frontier that is not yet full.
#[derive(Clone, Copy, Default)]
pub struct Cost(f64);

impl Cost {
    pub const ZERO: Cost = Cost(0.0);
    pub const INFINITY: Cost = Cost(f64::INFINITY);

    /// Creates a cost from a raw value.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `value` is negative or NaN.
    #[inline]
    pub fn new(value: f64) -> Self {
        debug_assert!(
            value >= 0.0,
            "called `Cost::new` with a negative or NaN value: {}",
            value
        );
        // Normalizes -0.0, which `total_cmp` would order below 0.0.
        Cost(value + 0.0)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl PartialEq for Cost {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for Cost {
    type Output = Cost;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Cost(self.0 + rhs.0)
    }
}

impl AddAssign for Cost {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::iter::Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, |acc, c| acc + c)
    }
}

impl std::fmt::Debug for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cost({})", self.0)
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_infinite() {
            write!(f, "Inf")
        } else {
            write!(f, "{:.3}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_total() {
        let mut v = vec![Cost::new(2.5), Cost::INFINITY, Cost::ZERO, Cost::new(0.1)];
        v.sort();
        assert_eq!(
            v,
            vec![Cost::ZERO, Cost::new(0.1), Cost::new(2.5), Cost::INFINITY]
        );
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        assert_eq!(Cost::new(-0.0), Cost::ZERO);
    }

    #[test]
    fn test_addition_and_sum() {
        let total: Cost = [Cost::new(1.0), Cost::new(0.5), Cost::new(0.25)]
            .into_iter()
            .sum();
        assert_eq!(total, Cost::new(1.75));
        let mut c = Cost::ZERO;
        c += Cost::new(3.0);
        assert!(c > Cost::new(2.99));
        assert!(Cost::new(1e300) < Cost::INFINITY);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Cost::new(1.5)), "1.500");
        assert_eq!(format!("{}", Cost::INFINITY), "Inf");
    }
}
