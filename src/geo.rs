//! Navigation math: bearings, distances, and angle deltas.
//!
//! Great-circle approximations only. Angles are degrees true on a
//! normalized `[0, 360)` domain; distances are nautical miles.

use std::f64::consts::PI;

use crate::model::{Coordinate, Fix};

/// Earth's radius in nautical miles.
const EARTH_RADIUS_NM: f64 = 3440.065;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Wraps any angle into `[0, 360)`.
pub fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest angular distance between two bearings, in `[0, 180]`.
pub fn angular_delta(a: f64, b: f64) -> f64 {
    let diff = (normalize_deg(a) - normalize_deg(b)).abs();
    diff.min(360.0 - diff)
}

/// Initial great-circle bearing from `from` to `to`.
pub fn bearing_deg(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat * DEG_TO_RAD;
    let lat2 = to.lat * DEG_TO_RAD;
    let d_lon = (to.lon - from.lon) * DEG_TO_RAD;

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_deg(y.atan2(x) * RAD_TO_DEG)
}

/// Haversine distance between two points.
pub fn distance_nm(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat * DEG_TO_RAD;
    let lat2 = to.lat * DEG_TO_RAD;
    let d_lat = lat2 - lat1;
    let d_lon = (to.lon - from.lon) * DEG_TO_RAD;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_NM * c
}

/// The straight-line vector between two fixes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub distance_nm: f64,
    pub bearing_deg: f64,
    pub speed_kn: f64,
}

impl Leg {
    /// Computes the leg from `from` to `to`.
    ///
    /// Returns `None` when the second fix is not strictly later than the first,
    /// since no speed can be derived.
    pub fn between(from: &Fix, to: &Fix) -> Option<Self> {
        let millis = to.at.as_millisecond() - from.at.as_millisecond();
        if millis <= 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let hours = millis as f64 / 3_600_000.0;
        let distance_nm = distance_nm(from.coordinate, to.coordinate);
        Some(Self {
            distance_nm,
            bearing_deg: bearing_deg(from.coordinate, to.coordinate),
            speed_kn: distance_nm / hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::FixSource;

    fn fix(seconds: i64, lat: f64, lon: f64) -> Fix {
        Fix::new(
            Timestamp::new(seconds, 0).unwrap(),
            Coordinate::new(lat, lon),
            FixSource::Device,
        )
    }

    #[test]
    fn delta_wraps_through_north() {
        assert_eq!(angular_delta(350.0, 10.0), 20.0);
        assert_eq!(angular_delta(10.0, 350.0), 20.0);
        assert_eq!(angular_delta(90.0, 270.0), 180.0);
        assert_eq!(angular_delta(-30.0, 30.0), 60.0);
    }

    #[test]
    fn normalize_negative_and_large() {
        assert_eq!(normalize_deg(-10.0), 350.0);
        assert_eq!(normalize_deg(720.0), 0.0);
        assert_eq!(normalize_deg(365.0), 5.0);
    }

    #[test]
    fn bearing_cardinal_points() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((bearing_deg(origin, Coordinate::new(1.0, 0.0)) - 0.0).abs() < 0.01);
        assert!((bearing_deg(origin, Coordinate::new(0.0, 1.0)) - 90.0).abs() < 0.01);
        assert!((bearing_deg(origin, Coordinate::new(-1.0, 0.0)) - 180.0).abs() < 0.01);
        assert!((bearing_deg(origin, Coordinate::new(0.0, -1.0)) - 270.0).abs() < 0.01);
    }

    #[test]
    fn one_degree_of_latitude_is_sixty_miles() {
        let d = distance_nm(Coordinate::new(54.0, 10.0), Coordinate::new(55.0, 10.0));
        assert!((d - 60.04).abs() < 0.1, "got {d}");
    }

    #[test]
    fn leg_speed_over_one_hour() {
        let leg = Leg::between(&fix(0, 54.0, 10.0), &fix(3600, 54.1, 10.0)).unwrap();
        assert!((leg.speed_kn - 6.0).abs() < 0.05, "got {}", leg.speed_kn);
        assert!(leg.bearing_deg < 0.01 || leg.bearing_deg > 359.99);
    }

    #[test]
    fn leg_needs_elapsed_time() {
        assert!(Leg::between(&fix(10, 54.0, 10.0), &fix(10, 54.1, 10.0)).is_none());
        assert!(Leg::between(&fix(10, 54.0, 10.0), &fix(5, 54.1, 10.0)).is_none());
    }
}
