//! Per-route trip windows derived from the published schedule.

use std::collections::HashMap;

use crate::identifiers::*;
use crate::models::{Direction, Route, ScheduleEntry};
use crate::schedule::time::parse_clock_time;

/// When one scheduled run is on the road, in seconds since local midnight.
///
/// Always `end_seconds > start_seconds`; runs crossing midnight are not indexed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripWindow {
    pub id: ScheduleIdentifier,
    pub start_seconds: u32,
    pub end_seconds: u32,
    pub direction: Direction,
}

impl TripWindow {
    pub fn duration_seconds(&self) -> u32 {
        self.end_seconds - self.start_seconds
    }

    pub fn contains(&self, now_seconds: u32) -> bool {
        self.start_seconds <= now_seconds && now_seconds <= self.end_seconds
    }
}

/// Trip windows grouped by route, each list sorted by start time
#[derive(Clone, Debug, Default)]
pub struct ScheduleIndex {
    windows: HashMap<RouteIdentifier, Vec<TripWindow>>,
}

impl ScheduleIndex {
    /// Index every usable entry.
    ///
    /// Entries without a known route, with unparseable times, or that do not end
    /// after they start are skipped; they are input noise, not errors.
    pub fn build<'a>(
        entries: impl IntoIterator<Item = &'a ScheduleEntry>,
        routes: &HashMap<RouteIdentifier, impl AsRef<Route>>,
    ) -> Self {
        let mut windows: HashMap<RouteIdentifier, Vec<TripWindow>> = HashMap::new();
        let mut dropped = 0usize;

        for entry in entries {
            let Some(route) = entry.route_id.as_ref().and_then(|id| routes.get(id)) else {
                tracing::debug!(entry = %entry.id, "schedule entry has no known route, skipping");
                dropped += 1;
                continue;
            };
            let route = route.as_ref();

            let (Some(start_seconds), Some(end_seconds)) = (
                parse_clock_time(&entry.departure_time),
                parse_clock_time(&entry.arrival_time),
            ) else {
                tracing::debug!(
                    entry = %entry.id,
                    departure = %entry.departure_time,
                    arrival = %entry.arrival_time,
                    "unparseable schedule times, skipping"
                );
                dropped += 1;
                continue;
            };

            if end_seconds <= start_seconds {
                tracing::debug!(entry = %entry.id, "schedule entry does not end after it starts, skipping");
                dropped += 1;
                continue;
            }

            windows.entry(route.id.clone()).or_default().push(TripWindow {
                id: entry.id.clone(),
                start_seconds,
                end_seconds,
                direction: resolve_direction(entry, route),
            });
        }

        for list in windows.values_mut() {
            list.sort_by_key(|w| w.start_seconds);
        }

        let indexed: usize = windows.values().map(Vec::len).sum();
        tracing::debug!(indexed, dropped, routes = windows.len(), "built schedule index");

        Self { windows }
    }

    /// Windows for a route, ordered by start time. Empty for unknown routes.
    pub fn windows(&self, route: &RouteIdentifier) -> &[TripWindow] {
        self.windows.get(route).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn route_count(&self) -> usize {
        self.windows.len()
    }

    pub fn window_count(&self) -> usize {
        self.windows.values().map(Vec::len).sum()
    }
}

/// Runs departing from the route's far terminus are reverse trips
pub fn resolve_direction(entry: &ScheduleEntry, route: &Route) -> Direction {
    match (&entry.start_stop_id, route.far_terminus()) {
        (Some(start), Some(terminus)) if start == terminus => Direction::Reverse,
        _ => Direction::Forward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Stop};
    use std::sync::Arc;

    fn routes() -> HashMap<RouteIdentifier, Arc<Route>> {
        let route = Route::new(
            "route-1",
            vec![
                Stop::new("s1", "New Bus Stand", Coordinate::new(11.132, 77.341)),
                Stop::new("s10", "Palladam Bus Stand", Coordinate::new(10.994, 77.283)),
            ],
        );
        HashMap::from([(route.id.clone(), Arc::new(route))])
    }

    fn route_id() -> RouteIdentifier {
        RouteIdentifier::new("route-1")
    }

    #[test]
    fn test_windows_sorted_by_start() {
        let entries = vec![
            ScheduleEntry::new("sch-5", "route-1", "3:00 PM", "4:00 PM"),
            ScheduleEntry::new("sch-1", "route-1", "8:00 AM", "9:00 AM"),
            ScheduleEntry::new("sch-3", "route-1", "11:00 AM", "12:00 PM"),
            ScheduleEntry::new("sch-2", "route-1", "9:30 AM", "10:30 AM"),
        ];

        let index = ScheduleIndex::build(&entries, &routes());
        let windows = index.windows(&route_id());

        assert_eq!(windows.len(), 4);
        assert!(windows.windows(2).all(|w| w[0].start_seconds <= w[1].start_seconds));
        assert_eq!(windows[0].id.as_str(), "sch-1");
        assert_eq!(windows[0].duration_seconds(), 3600);
    }

    #[test]
    fn test_drops_bad_entries() {
        let mut orphan = ScheduleEntry::new("orphan", "route-1", "8:00 AM", "9:00 AM");
        orphan.route_id = None;

        let entries = vec![
            ScheduleEntry::new("ok", "route-1", "8:00 AM", "9:00 AM"),
            ScheduleEntry::new("bad-time", "route-1", "25:00 AM", "9:00 AM"),
            ScheduleEntry::new("noon", "route-1", "noon", "1:00 PM"),
            ScheduleEntry::new("backwards", "route-1", "9:00 AM", "8:00 AM"),
            ScheduleEntry::new("overnight", "route-1", "11:30 PM", "12:30 AM"),
            ScheduleEntry::new("zero", "route-1", "9:00 AM", "9:00 AM"),
            ScheduleEntry::new("unknown-route", "route-404", "9:00 AM", "10:00 AM"),
            orphan,
        ];

        let index = ScheduleIndex::build(&entries, &routes());
        assert_eq!(index.window_count(), 1);
        assert_eq!(index.windows(&route_id())[0].id.as_str(), "ok");
        assert!(index.windows(&RouteIdentifier::new("route-404")).is_empty());
    }

    #[test]
    fn test_direction_from_far_terminus() {
        let entries = vec![
            ScheduleEntry::new("out", "route-1", "8:00 AM", "9:00 AM")
                .starting_at("s1")
                .ending_at("s10"),
            ScheduleEntry::new("back", "route-1", "9:30 AM", "10:30 AM")
                .starting_at("s10")
                .ending_at("s1"),
            ScheduleEntry::new("unspecified", "route-1", "11:00 AM", "12:00 PM"),
        ];

        let index = ScheduleIndex::build(&entries, &routes());
        let directions: Vec<Direction> = index.windows(&route_id()).iter().map(|w| w.direction).collect();
        assert_eq!(directions, vec![Direction::Forward, Direction::Reverse, Direction::Forward]);
    }

    #[test]
    fn test_explicit_far_terminus() {
        let mut route = (*routes()[&route_id()]).clone();
        route.far_terminus = Some(StopIdentifier::new("s1"));

        let entry = ScheduleEntry::new("x", "route-1", "8:00 AM", "9:00 AM").starting_at("s1");
        assert_eq!(resolve_direction(&entry, &route), Direction::Reverse);
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = TripWindow {
            id: "w".into(),
            start_seconds: 100,
            end_seconds: 200,
            direction: Direction::Forward,
        };
        assert!(window.contains(100));
        assert!(window.contains(200));
        assert!(!window.contains(99));
        assert!(!window.contains(201));
    }
}
