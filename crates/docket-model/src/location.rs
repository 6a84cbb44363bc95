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

//! Room locations and the metric used to decide whether two consecutive
//! meetings are too far apart to walk between.

/// The coordinates of a room.
///
/// Under `Ellipsoid::Legacy` the coordinates are planar grid units; under
/// `Ellipsoid::Wgs84` `x` is the latitude and `y` the longitude in degrees.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Location {
    x: f64,
    y: f64,
}

impl Location {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// How coordinates are turned into meters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Ellipsoid {
    /// Planar coordinates, ten meters per grid unit.
    #[default]
    Legacy,
    /// Latitude/longitude in degrees, great-circle distance.
    Wgs84,
}

impl std::fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ellipsoid::Legacy => write!(f, "Legacy"),
            Ellipsoid::Wgs84 => write!(f, "WGS-84"),
        }
    }
}

const LEGACY_METERS_PER_UNIT: f64 = 10.0;
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Parameters of the distance-conflict check.
///
/// Two meetings conflict on distance when they take place on a shared day
/// with a break shorter than `max_gap_minutes` and their rooms are more than
/// `tolerance_meters` apart.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DistanceMetric {
    ellipsoid: Ellipsoid,
    tolerance_meters: f64,
    max_gap_minutes: u32,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        Self {
            ellipsoid: Ellipsoid::Legacy,
            tolerance_meters: 0.0,
            max_gap_minutes: 10,
        }
    }
}

impl DistanceMetric {
    #[inline]
    pub fn new(ellipsoid: Ellipsoid, tolerance_meters: f64, max_gap_minutes: u32) -> Self {
        Self {
            ellipsoid,
            tolerance_meters: tolerance_meters.max(0.0),
            max_gap_minutes,
        }
    }

    #[inline]
    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    #[inline]
    pub fn tolerance_meters(&self) -> f64 {
        self.tolerance_meters
    }

    #[inline]
    pub fn max_gap_minutes(&self) -> u32 {
        self.max_gap_minutes
    }

    /// Returns the distance between two locations in meters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use docket_model::location::{DistanceMetric, Location};
    /// let metric = DistanceMetric::default();
    /// let d = metric.distance_meters(&Location::new(0.0, 0.0), &Location::new(3.0, 4.0));
    /// assert!((d - 50.0).abs() < 1e-9);
    /// ```
    pub fn distance_meters(&self, a: &Location, b: &Location) -> f64 {
        match self.ellipsoid {
            Ellipsoid::Legacy => {
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                LEGACY_METERS_PER_UNIT * (dx * dx + dy * dy).sqrt()
            }
            Ellipsoid::Wgs84 => {
                let (lat1, lat2) = (a.x.to_radians(), b.x.to_radians());
                let dlat = lat2 - lat1;
                let dlon = (b.y - a.y).to_radians();
                let h = (dlat / 2.0).sin().powi(2)
                    + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
                2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
            }
        }
    }

    /// Returns `true` if the rooms are farther apart than the tolerance.
    #[inline]
    pub fn too_far(&self, a: &Location, b: &Location) -> bool {
        self.distance_meters(a, b) > self.tolerance_meters
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DistanceMetric(ellipsoid: {}, tolerance: {}m, max gap: {}min)",
            self.ellipsoid, self.tolerance_meters, self.max_gap_minutes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_distance_scales_grid_units() {
        let m = DistanceMetric::default();
        let d = m.distance_meters(&Location::new(1.0, 1.0), &Location::new(4.0, 5.0));
        assert!((d - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_wgs84_distance_one_degree_latitude() {
        let m = DistanceMetric::new(Ellipsoid::Wgs84, 0.0, 10);
        let d = m.distance_meters(&Location::new(40.0, -86.9), &Location::new(41.0, -86.9));
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn test_same_location_is_never_too_far() {
        let m = DistanceMetric::default();
        let loc = Location::new(12.5, 7.0);
        assert!(!m.too_far(&loc, &loc));
    }

    #[test]
    fn test_tolerance_absorbs_short_walks() {
        let m = DistanceMetric::new(Ellipsoid::Legacy, 100.0, 10);
        assert!(!m.too_far(&Location::new(0.0, 0.0), &Location::new(6.0, 8.0)));
        assert!(m.too_far(&Location::new(0.0, 0.0), &Location::new(6.0, 9.0)));
    }
}
