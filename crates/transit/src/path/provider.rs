//! Pluggable road geometry.
//!
//! A route without an explicit full path can still follow real roads if some
//! external router supplies the geometry. Implementations must answer
//! synchronously; fetch and cache ahead of building the catalog.

use geo::LineString;

use crate::models::{Coordinate, Route};

/// Supplies road-following geometry for a route
pub trait GeometryProvider: Send + Sync {
    /// Geometry through the route's stops, or `None` to fall back to straight lines
    fn route_geometry(&self, route: &Route) -> Option<LineString>;
}

/// Straight lines between consecutive stops
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightLines;

impl GeometryProvider for StraightLines {
    fn route_geometry(&self, _route: &Route) -> Option<LineString> {
        None
    }
}

/// Pick the points a route's path is measured over
pub(crate) fn resolve_geometry(route: &Route, provider: &dyn GeometryProvider) -> Vec<Coordinate> {
    if let Some(explicit) = route.explicit_geometry() {
        return explicit.to_vec();
    }

    if let Some(line) = provider.route_geometry(route) {
        if line.0.len() >= 2 {
            return line.0.into_iter().map(Coordinate::from).collect();
        }
        tracing::debug!(route = %route.id, "provided geometry has fewer than 2 points, using stops");
    }

    route.stop_geometry()
}
