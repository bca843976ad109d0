//! Where a scheduled vehicle should be right now.
//!
//! Everything here is a pure function of the trip windows, the measured paths
//! and the time of day, and nothing allocates: it runs for every vehicle on
//! every tick.

use crate::models::Coordinate;
use crate::path::{MeasuredPath, RoutePaths};
use crate::schedule::TripWindow;
use crate::spatial::queries::{bearing, lerp};

/// Floor for zero-length segments when computing the fraction travelled
pub const MIN_SEGMENT_LENGTH_M: f64 = 1.0;

/// Floor for zero-length trips when computing average speed
pub const MIN_TRIP_MINUTES: f64 = 1.0;

/// Slowest speed reported for a vehicle that is on an active trip
pub const MIN_ACTIVE_SPEED_KMH: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TripPhase {
    /// On the road right now
    Active,
    /// Not started yet; the vehicle waits at the origin
    Upcoming,
    /// Finished; the vehicle waits at the destination
    Ended,
}

/// The trip a vehicle's position is derived from
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripSelection<'a> {
    pub window: &'a TripWindow,
    pub phase: TripPhase,
}

impl TripSelection<'_> {
    pub fn is_active(&self) -> bool {
        self.phase == TripPhase::Active
    }
}

/// Pick the reference trip for `now_seconds`.
///
/// The first window containing `now` wins. Between runs the most recently
/// ended trip is used (scanning from the back), then the earliest upcoming one,
/// then the first trip of the day. `None` only when there are no windows.
pub fn select_trip(windows: &[TripWindow], now_seconds: u32) -> Option<TripSelection<'_>> {
    if let Some(window) = windows.iter().find(|w| w.contains(now_seconds)) {
        return Some(TripSelection {
            window,
            phase: TripPhase::Active,
        });
    }

    if let Some(window) = windows.iter().rev().find(|w| now_seconds > w.end_seconds) {
        return Some(TripSelection {
            window,
            phase: TripPhase::Ended,
        });
    }

    if let Some(window) = windows.iter().find(|w| now_seconds < w.start_seconds) {
        return Some(TripSelection {
            window,
            phase: TripPhase::Upcoming,
        });
    }

    windows.first().map(|window| TripSelection {
        window,
        phase: if now_seconds < window.start_seconds {
            TripPhase::Upcoming
        } else {
            TripPhase::Ended
        },
    })
}

/// Fraction of the path covered, in [0, 1]
pub fn progress_for(selection: &TripSelection<'_>, now_seconds: u32) -> f64 {
    match selection.phase {
        TripPhase::Upcoming => 0.0,
        TripPhase::Ended => 1.0,
        TripPhase::Active => {
            let window = selection.window;
            let duration = window.duration_seconds();
            if duration == 0 {
                return 0.0;
            }
            let elapsed = now_seconds.saturating_sub(window.start_seconds);
            (elapsed as f64 / duration as f64).clamp(0.0, 1.0)
        }
    }
}

/// A point on a measured path
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPosition {
    pub coordinate: Coordinate,
    /// Bearing of the segment being travelled, degrees in [0, 360)
    pub heading: f64,
    /// Index of that segment
    pub segment: usize,
}

/// Resolve a progress fraction to a coordinate and heading.
///
/// Progress 0 is exactly the first point and progress 1 exactly the last.
pub fn locate(path: &MeasuredPath, progress: f64) -> PathPosition {
    let points = path.points();
    let lengths = path.segment_lengths();
    let last_segment = lengths.len() - 1;

    let progress = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };

    if progress >= 1.0 {
        return PathPosition {
            coordinate: path.last(),
            heading: bearing(points[last_segment], points[last_segment + 1]),
            segment: last_segment,
        };
    }

    let mut remaining = progress * path.total_length();
    let mut segment = 0;
    while segment < last_segment && remaining > lengths[segment] {
        remaining -= lengths[segment];
        segment += 1;
    }

    let start = points[segment];
    let end = points[segment + 1];
    let length = if lengths[segment] > 0.0 {
        lengths[segment]
    } else {
        MIN_SEGMENT_LENGTH_M
    };
    let t = (remaining / length).clamp(0.0, 1.0);

    PathPosition {
        coordinate: lerp(start, end, t),
        heading: bearing(start, end),
        segment,
    }
}

/// Average speed over a trip in km/h, before any floor is applied
pub fn average_speed_kmh(path: &MeasuredPath, window: &TripWindow) -> f64 {
    let minutes = match window.duration_seconds() as f64 / 60.0 {
        m if m > 0.0 => m,
        _ => MIN_TRIP_MINUTES,
    };

    (path.total_length() / 1000.0) / (minutes / 60.0)
}

/// Simulated state of one vehicle at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion<'a> {
    pub coordinate: Coordinate,
    pub heading: f64,
    /// km/h; zero unless the trip is active
    pub speed_kmh: f64,
    pub trip: TripSelection<'a>,
}

/// Compute a vehicle's motion, or `None` when it should hold its last state
/// (no trip windows, or a degenerate zero-length path).
pub fn simulate<'a>(windows: &'a [TripWindow], paths: &RoutePaths, now_seconds: u32) -> Option<Motion<'a>> {
    let trip = select_trip(windows, now_seconds)?;

    let path = paths.get(trip.window.direction);
    if path.total_length() <= 0.0 || !path.total_length().is_finite() {
        return None;
    }

    let progress = progress_for(&trip, now_seconds);
    let position = locate(path, progress);

    let speed = average_speed_kmh(path, trip.window);
    let speed_kmh = if trip.is_active() && speed.is_finite() {
        speed.max(MIN_ACTIVE_SPEED_KMH)
    } else {
        0.0
    };

    Some(Motion {
        coordinate: position.coordinate,
        heading: position.heading,
        speed_kmh,
        trip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use crate::spatial::queries::{distance, EARTH_RADIUS_M};
    use approx::assert_relative_eq;

    fn window(id: &str, start: u32, end: u32, direction: Direction) -> TripWindow {
        TripWindow {
            id: id.into(),
            start_seconds: start,
            end_seconds: end,
            direction,
        }
    }

    /// Two points `meters` apart due east along the equator
    fn east_path(meters: f64) -> MeasuredPath {
        let d_lon = (meters / EARTH_RADIUS_M).to_degrees();
        MeasuredPath::build(vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, d_lon)]).unwrap()
    }

    fn paths(forward: MeasuredPath) -> RoutePaths {
        let reverse = forward.reversed();
        RoutePaths { forward, reverse }
    }

    #[test]
    fn test_select_active_over_others() {
        let windows = vec![
            window("early", 100, 200, Direction::Forward),
            window("now", 300, 400, Direction::Reverse),
            window("later", 500, 600, Direction::Forward),
        ];

        let selection = select_trip(&windows, 350).unwrap();
        assert_eq!(selection.window.id.as_str(), "now");
        assert_eq!(selection.phase, TripPhase::Active);
    }

    #[test]
    fn test_select_between_runs_prefers_ended() {
        let windows = vec![
            window("a", 100, 200, Direction::Forward),
            window("b", 300, 400, Direction::Reverse),
            window("c", 500, 600, Direction::Forward),
        ];

        let selection = select_trip(&windows, 450).unwrap();
        assert_eq!(selection.window.id.as_str(), "b");
        assert_eq!(selection.phase, TripPhase::Ended);

        let after_all = select_trip(&windows, 700).unwrap();
        assert_eq!(after_all.window.id.as_str(), "c");
        assert_eq!(after_all.phase, TripPhase::Ended);
    }

    #[test]
    fn test_select_before_first_run() {
        let windows = vec![
            window("a", 100, 200, Direction::Forward),
            window("b", 300, 400, Direction::Forward),
        ];

        let selection = select_trip(&windows, 50).unwrap();
        assert_eq!(selection.window.id.as_str(), "a");
        assert_eq!(selection.phase, TripPhase::Upcoming);
    }

    #[test]
    fn test_select_without_windows() {
        assert!(select_trip(&[], 1000).is_none());
    }

    #[test]
    fn test_progress_per_phase() {
        let w = window("w", 1000, 2000, Direction::Forward);
        let active = TripSelection {
            window: &w,
            phase: TripPhase::Active,
        };
        assert_relative_eq!(progress_for(&active, 1250), 0.25);
        assert_eq!(progress_for(&active, 1000), 0.0);
        assert_eq!(progress_for(&active, 2000), 1.0);

        let upcoming = TripSelection {
            phase: TripPhase::Upcoming,
            ..active
        };
        assert_eq!(progress_for(&upcoming, 500), 0.0);

        let ended = TripSelection {
            phase: TripPhase::Ended,
            ..active
        };
        assert_eq!(progress_for(&ended, 2500), 1.0);
    }

    #[test]
    fn test_locate_boundaries_are_exact() {
        let path = MeasuredPath::build(vec![
            Coordinate::new(11.13211374217086, 77.34124259570535),
            Coordinate::new(11.113396582111964, 77.33947428979899),
            Coordinate::new(11.106723361295671, 77.34157975759351),
            Coordinate::new(10.9944167, 77.283062),
        ])
        .unwrap();

        assert_eq!(locate(&path, 0.0).coordinate, path.first());
        assert_eq!(locate(&path, 1.0).coordinate, path.last());
        assert_eq!(locate(&path, 1.0).segment, 2);
        assert_eq!(locate(&path, -3.0).coordinate, path.first());
        assert_eq!(locate(&path, f64::NAN).coordinate, path.first());
    }

    #[test]
    fn test_locate_walks_segments() {
        // Three 1 km legs along the equator
        let leg = (1000.0 / EARTH_RADIUS_M).to_degrees();
        let path = MeasuredPath::build(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, leg),
            Coordinate::new(0.0, 2.0 * leg),
            Coordinate::new(0.0, 3.0 * leg),
        ])
        .unwrap();

        let position = locate(&path, 0.5);
        assert_eq!(position.segment, 1);
        assert_relative_eq!(position.coordinate.longitude, 1.5 * leg, epsilon = 1e-9);
        assert_relative_eq!(position.heading, 90.0, epsilon = 1e-9);

        let traveled = distance(path.first(), position.coordinate);
        assert_relative_eq!(traveled, 1500.0, epsilon = 1e-3);
    }

    #[test]
    fn test_locate_zero_length_segment() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 0.01);
        let path = MeasuredPath::build(vec![a, a, b]).unwrap();

        let position = locate(&path, 0.5);
        assert_eq!(position.segment, 1);
        assert!(position.coordinate.is_finite());
    }

    #[test]
    fn test_average_speed() {
        let path = east_path(1000.0);
        let w = window("w", 0, 600, Direction::Forward);
        assert_relative_eq!(average_speed_kmh(&path, &w), 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_simulate_mid_trip() {
        let paths = paths(east_path(1000.0));
        let windows = vec![window("w", 0, 600, Direction::Forward)];

        let motion = simulate(&windows, &paths, 300).unwrap();
        assert!(motion.trip.is_active());
        assert_relative_eq!(distance(paths.forward.first(), motion.coordinate), 500.0, epsilon = 1e-3);
        assert_relative_eq!(motion.heading, 90.0, epsilon = 1e-9);
        assert_relative_eq!(motion.speed_kmh, 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_simulate_after_trip() {
        let paths = paths(east_path(1000.0));
        let windows = vec![window("w", 0, 600, Direction::Forward)];

        let motion = simulate(&windows, &paths, 700).unwrap();
        assert_eq!(motion.trip.phase, TripPhase::Ended);
        assert_eq!(motion.coordinate, paths.forward.last());
        assert_eq!(motion.speed_kmh, 0.0);
    }

    #[test]
    fn test_simulate_reverse_trip_uses_reverse_path() {
        let paths = paths(east_path(1000.0));
        let windows = vec![window("back", 1000, 1600, Direction::Reverse)];

        let parked = simulate(&windows, &paths, 900).unwrap();
        assert_eq!(parked.trip.phase, TripPhase::Upcoming);
        assert_eq!(parked.coordinate, paths.reverse.first());
        assert_eq!(parked.coordinate, paths.forward.last());
        assert_eq!(parked.speed_kmh, 0.0);

        let moving = simulate(&windows, &paths, 1300).unwrap();
        assert_relative_eq!(moving.heading, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_simulate_applies_speed_floor() {
        // 100 m in an hour would be 0.1 km/h
        let paths = paths(east_path(100.0));
        let windows = vec![window("slow", 0, 3600, Direction::Forward)];

        let motion = simulate(&windows, &paths, 1800).unwrap();
        assert_eq!(motion.speed_kmh, MIN_ACTIVE_SPEED_KMH);
    }

    #[test]
    fn test_simulate_degenerate_path_holds() {
        let spot = Coordinate::new(11.0, 77.0);
        let paths = paths(MeasuredPath::build(vec![spot, spot]).unwrap());
        let windows = vec![window("w", 0, 600, Direction::Forward)];

        assert!(simulate(&windows, &paths, 300).is_none());
        assert!(simulate(&[], &paths, 300).is_none());
    }
}
