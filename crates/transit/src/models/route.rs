//! Static route catalog entries: routes and their ordered stops.

use crate::identifiers::*;
use crate::models::types::Coordinate;

/// A boarding point, or a waypoint that only shapes the route geometry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: String,
    pub coordinate: Coordinate,
    /// Timetable text shown next to the stop, e.g. "07:10"
    #[cfg_attr(feature = "serde", serde(default))]
    pub scheduled_arrival: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_waypoint: bool,
}

impl Stop {
    pub fn new(id: impl Into<StopIdentifier>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            scheduled_arrival: String::new(),
            is_waypoint: false,
        }
    }

    pub fn waypoint(id: impl Into<StopIdentifier>, coordinate: Coordinate) -> Self {
        Self {
            is_waypoint: true,
            ..Self::new(id, String::new(), coordinate)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub id: RouteIdentifier,

    /// Short public number, e.g. "20"
    #[cfg_attr(feature = "serde", serde(default))]
    pub number: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_location: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end_location: String,
    /// Display color (hex RGB, e.g. "#4ECDC4")
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Option<String>,

    pub stops: Vec<Stop>,

    /// Exact road geometry. Preferred over stop coordinates when it has at least two points.
    #[cfg_attr(feature = "serde", serde(default))]
    pub full_path: Option<Vec<Coordinate>>,

    /// Trips departing from this stop run in reverse.
    /// Defaults to the last non-waypoint stop.
    #[cfg_attr(feature = "serde", serde(default))]
    pub far_terminus: Option<StopIdentifier>,
}

impl Route {
    pub fn new(id: impl Into<RouteIdentifier>, stops: Vec<Stop>) -> Self {
        Self {
            id: id.into(),
            number: String::new(),
            name: String::new(),
            start_location: String::new(),
            end_location: String::new(),
            color: None,
            stops,
            full_path: None,
            far_terminus: None,
        }
    }

    /// Stops a passenger can board at, in route order
    pub fn service_stops(&self) -> impl DoubleEndedIterator<Item = &Stop> + '_ {
        self.stops.iter().filter(|s| !s.is_waypoint)
    }

    pub fn far_terminus(&self) -> Option<&StopIdentifier> {
        self.far_terminus
            .as_ref()
            .or_else(|| self.service_stops().next_back().map(|s| &s.id))
    }

    /// Explicit geometry override, if it is usable
    pub fn explicit_geometry(&self) -> Option<&[Coordinate]> {
        self.full_path.as_deref().filter(|path| path.len() >= 2)
    }

    /// All stop coordinates in order, waypoints included
    pub fn stop_geometry(&self) -> Vec<Coordinate> {
        self.stops.iter().map(|s| s.coordinate).collect()
    }
}
