//! Great-circle distance, bearing and planar interpolation helpers.
//!
//! Distances use the haversine formula on a sphere of radius 6,371 km.
//! Interpolation and segment projection work directly in latitude/longitude
//! space, which is accurate enough over the few hundred meters between stops.

use geo::{HaversineBearing, Point};

use crate::models::types::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const METERS_PER_DEGREE: f64 = 111_320.0;

/// Haversine distance between two coordinates in meters
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lon = (d_lon / 2.0).sin();
    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;

    // h can drift a hair above 1.0 for antipodal points
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Initial bearing from `a` towards `b`, in degrees within [0, 360).
///
/// Identical points have no direction and report 0.
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let from: Point = a.into();
    let degrees = (from.haversine_bearing(b.into()) + 360.0) % 360.0;
    // -0.0 and rounding can land exactly on 360
    if degrees >= 360.0 {
        0.0
    } else {
        degrees
    }
}

/// Linear interpolation in latitude/longitude space.
///
/// `t` is not clamped here; callers keep it within [0, 1].
pub fn lerp(a: Coordinate, b: Coordinate, t: f64) -> Coordinate {
    Coordinate {
        latitude: a.latitude + (b.latitude - a.latitude) * t,
        longitude: a.longitude + (b.longitude - a.longitude) * t,
    }
}

/// Closest point on a segment to some point, found by scalar projection
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentProjection {
    /// Parametric position along the segment, within [0, 1]
    pub t: f64,
    pub point: Coordinate,
}

impl SegmentProjection {
    /// Great-circle distance from `from` to the projected point
    pub fn error(&self, from: Coordinate) -> f64 {
        distance(from, self.point)
    }
}

/// Project `point` onto the segment `start`..`end` in latitude/longitude space.
///
/// A zero-length segment projects everything onto its start.
pub fn project_onto_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> SegmentProjection {
    let ab = [end.latitude - start.latitude, end.longitude - start.longitude];
    let ap = [point.latitude - start.latitude, point.longitude - start.longitude];

    let ab_ab = ab[0] * ab[0] + ab[1] * ab[1];

    let t = if ab_ab == 0.0 {
        0.0
    } else {
        ((ab[0] * ap[0] + ab[1] * ap[1]) / ab_ab).clamp(0.0, 1.0)
    };

    SegmentProjection {
        t,
        point: lerp(start, end, t),
    }
}

/// Convert degrees to approximate meters at equator (for bounding box queries)
pub fn degrees_to_meters_approx(degrees: f64) -> f64 {
    degrees * METERS_PER_DEGREE
}

/// Convert meters to degrees at equator (for bounding box queries)
pub fn meters_to_degrees_approx(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}
