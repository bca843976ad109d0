//! In-memory catalog of routes and schedules.
//!
//! Everything the simulation needs per tick is derived once here: measured
//! paths for both directions, stop lines with cumulative distances, trip
//! windows, and a spatial index over boarding stops. After construction the
//! catalog is read-only and can be shared behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::{Coordinate, Route, ScheduleEntry};
use crate::path::{GeometryProvider, RoutePaths, RouteStopLines, StraightLines};
use crate::schedule::{ScheduleIndex, TimetableFilter, TripWindow};
use crate::spatial::index::{NearbyStop, StopIndex, StopNode};

pub struct StaticCatalog {
    // Core data
    routes: Vec<Arc<Route>>,
    schedule: Vec<ScheduleEntry>,

    // Lookup maps
    route_map: HashMap<RouteIdentifier, Arc<Route>>,
    paths: HashMap<RouteIdentifier, RoutePaths>,
    stop_lines: HashMap<RouteIdentifier, RouteStopLines>,

    // Indices
    schedule_index: ScheduleIndex,
    stop_index: StopIndex,
}

impl StaticCatalog {
    /// Build a catalog using straight lines between stops
    pub fn from_data(routes: Vec<Route>, schedule: Vec<ScheduleEntry>) -> Self {
        Self::with_geometry(routes, schedule, &StraightLines)
    }

    /// Build a catalog, asking `provider` for road geometry where a route has
    /// no explicit path
    pub fn with_geometry(routes: Vec<Route>, schedule: Vec<ScheduleEntry>, provider: &dyn GeometryProvider) -> Self {
        let mut route_map: HashMap<RouteIdentifier, Arc<Route>> = HashMap::new();
        let mut ordered: Vec<Arc<Route>> = Vec::with_capacity(routes.len());

        for route in routes {
            let route = Arc::new(route);
            if route_map.insert(route.id.clone(), route.clone()).is_some() {
                tracing::warn!(route = %route.id, "duplicate route id, keeping the last definition");
                ordered.retain(|r| r.id != route.id);
            }
            ordered.push(route);
        }

        let mut paths = HashMap::new();
        let mut stop_lines = HashMap::new();
        let mut stop_nodes = Vec::new();

        for route in &ordered {
            match RoutePaths::for_route(route, provider) {
                Ok(measured) => {
                    tracing::debug!(
                        route = %route.id,
                        points = measured.forward.points().len(),
                        length_m = measured.forward.total_length(),
                        "measured route path"
                    );
                    paths.insert(route.id.clone(), measured);
                }
                Err(err) => tracing::warn!(route = %route.id, "route will not be simulated: {err}"),
            }

            stop_lines.insert(route.id.clone(), RouteStopLines::for_route(route));

            stop_nodes.extend(
                route
                    .service_stops()
                    .filter(|s| s.coordinate.is_finite())
                    .map(|s| StopNode::new(route.id.clone(), s.id.clone(), s.coordinate)),
            );
        }

        let schedule_index = ScheduleIndex::build(&schedule, &route_map);
        let stop_index = StopIndex::new(stop_nodes);

        tracing::info!(
            routes = ordered.len(),
            simulated = paths.len(),
            trips = schedule_index.window_count(),
            stops = stop_index.len(),
            "catalog ready"
        );

        Self {
            routes: ordered,
            schedule,
            route_map,
            paths,
            stop_lines,
            schedule_index,
            stop_index,
        }
    }

    pub fn route(&self, id: &RouteIdentifier) -> Option<&Route> {
        self.route_map.get(id).map(Arc::as_ref)
    }

    /// Routes in the order they were supplied
    pub fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
        self.routes.iter().map(Arc::as_ref)
    }

    /// Measured paths, absent for routes with fewer than two usable points
    pub fn paths(&self, id: &RouteIdentifier) -> Option<&RoutePaths> {
        self.paths.get(id)
    }

    pub fn stop_lines(&self, id: &RouteIdentifier) -> Option<&RouteStopLines> {
        self.stop_lines.get(id)
    }

    /// Whether vehicles on this route can be moved by the simulator
    pub fn is_simulated(&self, id: &RouteIdentifier) -> bool {
        self.paths.contains_key(id)
    }

    /// Trip windows for a route, ordered by start time
    pub fn trip_windows(&self, id: &RouteIdentifier) -> &[TripWindow] {
        self.schedule_index.windows(id)
    }

    pub fn schedule_index(&self) -> &ScheduleIndex {
        &self.schedule_index
    }

    /// Every schedule entry as published, including ones that were not indexed
    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    pub fn timetable(&self, filter: &TimetableFilter) -> Vec<&ScheduleEntry> {
        filter.apply(&self.schedule).collect()
    }

    /// Boarding stops within `radius_m` meters, nearest first
    pub fn stops_near(&self, coordinate: Coordinate, radius_m: f64) -> Vec<NearbyStop<'_>> {
        self.stop_index.stops_near(coordinate, radius_m)
    }

    pub fn nearest_stop(&self, coordinate: Coordinate) -> Option<NearbyStop<'_>> {
        self.stop_index.nearest_stop(coordinate)
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::from_data(Vec::new(), Vec::new())
    }
}
