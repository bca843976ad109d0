//! Boarding stops of a route with cumulative distances, per direction.

use crate::identifiers::StopIdentifier;
use crate::models::{Coordinate, Direction, Route};
use crate::spatial::queries::distance;

#[derive(Clone, Debug, PartialEq)]
pub struct LineStop {
    pub id: StopIdentifier,
    pub name: String,
    pub coordinate: Coordinate,
}

/// Ordered non-waypoint stops, oriented in one travel direction.
///
/// `cumulative[i]` is the straight-line distance in meters from the first stop
/// to stop `i`, so `cumulative[0] == 0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StopLine {
    stops: Vec<LineStop>,
    cumulative: Vec<f64>,
}

impl StopLine {
    pub fn build(stops: Vec<LineStop>) -> Self {
        let mut cumulative = Vec::with_capacity(stops.len());
        let mut total = 0.0;

        for (i, stop) in stops.iter().enumerate() {
            if i > 0 {
                total += distance(stops[i - 1].coordinate, stop.coordinate);
            }
            cumulative.push(total);
        }

        Self { stops, cumulative }
    }

    pub fn for_route(route: &Route, direction: Direction) -> Self {
        let to_line_stop = |s: &crate::models::Stop| LineStop {
            id: s.id.clone(),
            name: s.name.clone(),
            coordinate: s.coordinate,
        };

        let stops = match direction {
            Direction::Forward => route.service_stops().map(to_line_stop).collect(),
            Direction::Reverse => route.service_stops().rev().map(to_line_stop).collect(),
        };

        Self::build(stops)
    }

    pub fn stops(&self) -> &[LineStop] {
        &self.stops
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Forward and reverse stop lines for one route
#[derive(Clone, Debug, Default)]
pub struct RouteStopLines {
    pub forward: StopLine,
    pub reverse: StopLine,
}

impl RouteStopLines {
    pub fn for_route(route: &Route) -> Self {
        Self {
            forward: StopLine::for_route(route, Direction::Forward),
            reverse: StopLine::for_route(route, Direction::Reverse),
        }
    }

    pub fn get(&self, direction: Direction) -> &StopLine {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }
}
