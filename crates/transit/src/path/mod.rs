//! Measured paths: ordered geometry with per-segment and total lengths.

pub mod provider;
pub mod stop_line;

pub use provider::{GeometryProvider, StraightLines};
pub use stop_line::{LineStop, RouteStopLines, StopLine};

use geo::LineString;

use crate::models::{Coordinate, Direction, Result, Route, TransitError};
use crate::spatial::queries::distance;

/// Geometry measured once so per-tick lookups are pure arithmetic.
///
/// `segment_lengths[i]` is the distance from `points[i]` to `points[i + 1]`, and
/// `total_length` is their sum. Always holds at least two points.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredPath {
    points: Vec<Coordinate>,
    segment_lengths: Vec<f64>,
    total_length: f64,
}

impl MeasuredPath {
    /// Measure `points` with the haversine distance. Needs at least two points.
    pub fn build(points: Vec<Coordinate>) -> Option<Self> {
        Self::build_with(points, distance)
    }

    /// Measure `points` with a caller-supplied metric, which need not be symmetric
    pub fn build_with(points: Vec<Coordinate>, metric: impl Fn(Coordinate, Coordinate) -> f64) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let segment_lengths: Vec<f64> = points.windows(2).map(|pair| metric(pair[0], pair[1])).collect();
        let total_length = segment_lengths.iter().sum();

        Some(Self {
            points,
            segment_lengths,
            total_length,
        })
    }

    /// The same geometry walked end to start, re-measured pair by pair
    pub fn reversed(&self) -> Self {
        self.reversed_with(distance)
    }

    pub fn reversed_with(&self, metric: impl Fn(Coordinate, Coordinate) -> f64) -> Self {
        let points: Vec<Coordinate> = self.points.iter().rev().copied().collect();
        // A built path always has at least two points
        let segment_lengths: Vec<f64> = points.windows(2).map(|pair| metric(pair[0], pair[1])).collect();
        let total_length = segment_lengths.iter().sum();

        Self {
            points,
            segment_lengths,
            total_length,
        }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn segment_lengths(&self) -> &[f64] {
        &self.segment_lengths
    }

    /// Total length in meters
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn first(&self) -> Coordinate {
        self.points[0]
    }

    pub fn last(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    /// Geometry as a `geo` line string (x = longitude, y = latitude)
    pub fn to_line_string(&self) -> LineString {
        self.points.iter().map(|&c| geo::Coord::from(c)).collect()
    }
}

/// Forward and reverse paths for one route. They share no state.
#[derive(Clone, Debug)]
pub struct RoutePaths {
    pub forward: MeasuredPath,
    pub reverse: MeasuredPath,
}

impl RoutePaths {
    /// Measure a route's geometry.
    ///
    /// Source priority: the route's explicit full path, then the geometry
    /// provider, then the stop coordinates (waypoints included).
    pub fn for_route(route: &Route, provider: &dyn GeometryProvider) -> Result<Self> {
        let points = provider::resolve_geometry(route, provider);
        let count = points.len();

        let forward = MeasuredPath::build(points).ok_or_else(|| TransitError::InsufficientGeometry {
            route: route.id.clone(),
            points: count,
        })?;
        let reverse = forward.reversed();

        Ok(Self { forward, reverse })
    }

    pub fn get(&self, direction: Direction) -> &MeasuredPath {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stop;
    use approx::assert_relative_eq;

    fn tiruppur_points() -> Vec<Coordinate> {
        vec![
            Coordinate::new(11.13211374217086, 77.34124259570535),
            Coordinate::new(11.113396582111964, 77.33947428979899),
            Coordinate::new(11.106723361295671, 77.34157975759351),
            Coordinate::new(11.098076575583528, 77.34919748242261),
        ]
    }

    #[test]
    fn test_build_requires_two_points() {
        assert!(MeasuredPath::build(vec![]).is_none());
        assert!(MeasuredPath::build(vec![Coordinate::new(1.0, 1.0)]).is_none());
        assert!(MeasuredPath::build(vec![Coordinate::new(1.0, 1.0), Coordinate::new(1.0, 1.0)]).is_some());
    }

    #[test]
    fn test_total_length_is_sum_of_segments() {
        let path = MeasuredPath::build(tiruppur_points()).unwrap();
        assert_eq!(path.segment_lengths().len(), path.points().len() - 1);

        let sum: f64 = path.segment_lengths().iter().sum();
        assert_relative_eq!(path.total_length(), sum, epsilon = 1e-9);

        for (i, len) in path.segment_lengths().iter().enumerate() {
            assert_eq!(*len, distance(path.points()[i], path.points()[i + 1]));
        }
    }

    #[test]
    fn test_reverse_recomputes_lengths() {
        let path = MeasuredPath::build(tiruppur_points()).unwrap();
        let reverse = path.reversed();

        assert_eq!(reverse.first(), path.last());
        assert_eq!(reverse.last(), path.first());
        assert_relative_eq!(reverse.total_length(), path.total_length(), epsilon = 1e-6);

        // An asymmetric metric must be applied to the reversed pairs
        let uphill = |a: Coordinate, b: Coordinate| if b.latitude > a.latitude { 2.0 } else { 1.0 };
        let forward = MeasuredPath::build_with(tiruppur_points(), uphill).unwrap();
        let backward = forward.reversed_with(uphill);
        assert_eq!(forward.segment_lengths(), &[1.0, 1.0, 1.0]);
        assert_eq!(backward.segment_lengths(), &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_line_string_export() {
        let path = MeasuredPath::build(tiruppur_points()).unwrap();
        let line = path.to_line_string();
        assert_eq!(line.0.len(), 4);
        assert_eq!(line.0[0].x, 77.34124259570535);
        assert_eq!(line.0[0].y, 11.13211374217086);
    }

    #[test]
    fn test_route_paths_from_stops() {
        let stops = tiruppur_points()
            .into_iter()
            .enumerate()
            .map(|(i, c)| Stop::new(format!("s{}", i + 1), format!("Stop {}", i + 1), c))
            .collect();
        let route = Route::new("route-1", stops);

        let paths = RoutePaths::for_route(&route, &StraightLines).unwrap();
        assert_eq!(paths.get(Direction::Forward).points().len(), 4);
        assert_eq!(paths.get(Direction::Reverse).first(), paths.forward.last());
    }

    #[test]
    fn test_route_paths_insufficient_geometry() {
        let route = Route::new("lonely", vec![Stop::new("s1", "Only", Coordinate::new(11.0, 77.0))]);
        let err = RoutePaths::for_route(&route, &StraightLines).unwrap_err();
        assert!(matches!(err, TransitError::InsufficientGeometry { points: 1, .. }));
    }
}
