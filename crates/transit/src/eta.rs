//! Next stop and arrival estimate for a vehicle at an arbitrary position.
//!
//! The position may come from the simulator or from a live GPS fix; both are
//! projected onto the route's stop line the same way.

use std::fmt;

use crate::identifiers::StopIdentifier;
use crate::models::{Coordinate, Direction};
use crate::path::{RouteStopLines, StopLine};
use crate::schedule::{format_clock_time, TripWindow};
use crate::simulation::position::{select_trip, TripPhase};
use crate::spatial::queries::{distance, project_onto_segment};

/// A stop this close ahead of the projected position is treated as already reached
pub const NEXT_STOP_TOLERANCE_M: f64 = 10.0;

/// Where a position falls along a stop line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Meters from the first stop, measured along the stop line
    pub distance_along: f64,
    /// Segment (pair of stops) the position was projected onto
    pub segment: usize,
    /// Index of the next stop ahead
    pub next_index: usize,
}

/// Project `position` onto the closest segment of `line`.
///
/// `None` only for a line without stops.
pub fn project(line: &StopLine, position: Coordinate) -> Option<Projection> {
    let stops = line.stops();
    let cumulative = line.cumulative();
    if stops.is_empty() {
        return None;
    }

    let mut best_error = f64::INFINITY;
    let mut segment = 0;
    let mut distance_along = 0.0;

    for (i, pair) in stops.windows(2).enumerate() {
        let (start, end) = (pair[0].coordinate, pair[1].coordinate);
        let projected = project_onto_segment(position, start, end);
        let error = projected.error(position);

        if error < best_error {
            best_error = error;
            segment = i;
            distance_along = cumulative[i] + distance(start, projected.point);
        }
    }

    let next_index = cumulative
        .iter()
        .position(|&c| c > distance_along + NEXT_STOP_TOLERANCE_M)
        .unwrap_or(stops.len() - 1);

    Some(Projection {
        distance_along,
        segment,
        next_index,
    })
}

/// A human-facing arrival estimate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eta {
    UnderAMinute,
    Minutes(u32),
    /// No trip running; the next one departs at this many seconds past midnight
    DepartsAt(u32),
    /// Not moving and nothing scheduled
    Unknown,
}

impl Eta {
    /// Travel time for `remaining_m` meters at `speed_kmh`
    pub fn from_travel(remaining_m: f64, speed_kmh: f64) -> Self {
        if !(speed_kmh > 0.0) || !speed_kmh.is_finite() || !remaining_m.is_finite() {
            return Self::Unknown;
        }

        let minutes = (remaining_m.max(0.0) / 1000.0) / speed_kmh * 60.0;
        if minutes < 1.0 {
            Self::UnderAMinute
        } else {
            Self::Minutes(minutes.round() as u32)
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderAMinute => f.write_str("under a minute"),
            Self::Minutes(minutes) => write!(f, "{} min", minutes),
            Self::DepartsAt(seconds) => write!(f, "departs {}", format_clock_time(*seconds)),
            Self::Unknown => f.write_str("--"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NextStop {
    pub stop_id: StopIdentifier,
    pub name: String,
    pub direction: Direction,
    pub projection: Projection,
    pub eta: Eta,
}

/// Resolve the next stop and ETA for a vehicle.
///
/// The stop line is oriented by the vehicle's reference trip. A computed ETA is
/// only given while that trip is active; otherwise the next departure time is
/// reported, or [`Eta::Unknown`] when nothing else runs today.
pub fn next_stop(
    lines: &RouteStopLines,
    windows: &[TripWindow],
    position: Coordinate,
    speed_kmh: f64,
    now_seconds: u32,
) -> Option<NextStop> {
    let selection = select_trip(windows, now_seconds);
    let direction = selection.map(|s| s.window.direction).unwrap_or_default();

    let line = lines.get(direction);
    let projection = project(line, position)?;
    let stop = &line.stops()[projection.next_index];

    let eta = match selection {
        Some(s) if s.phase == TripPhase::Active => {
            let remaining = line.cumulative()[projection.next_index] - projection.distance_along;
            Eta::from_travel(remaining.max(0.0), speed_kmh)
        }
        _ => windows
            .iter()
            .find(|w| now_seconds < w.start_seconds)
            .map(|w| Eta::DepartsAt(w.start_seconds))
            .unwrap_or(Eta::Unknown),
    };

    Some(NextStop {
        stop_id: stop.id.clone(),
        name: stop.name.clone(),
        direction,
        projection,
        eta,
    })
}
