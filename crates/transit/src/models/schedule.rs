//! Timetable entries, as published.

use crate::identifiers::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScheduleStatus {
    #[default]
    OnTime,
    Delayed,
    Cancelled,
}

/// One scheduled run of a route.
///
/// Times are kept as the published 12-hour strings ("8:00 AM"); they are only
/// parsed when the schedule index is built, and entries that fail to parse are
/// left out of the simulation but remain visible in the timetable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleEntry {
    pub id: ScheduleIdentifier,
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_id: Option<RouteIdentifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_number: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_name: String,
    pub departure_time: String,
    pub arrival_time: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub frequency: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: ScheduleStatus,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_stop_id: Option<StopIdentifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end_stop_id: Option<StopIdentifier>,
}

impl ScheduleEntry {
    pub fn new(
        id: impl Into<ScheduleIdentifier>,
        route_id: impl Into<RouteIdentifier>,
        departure_time: impl Into<String>,
        arrival_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            route_id: Some(route_id.into()),
            route_number: String::new(),
            route_name: String::new(),
            departure_time: departure_time.into(),
            arrival_time: arrival_time.into(),
            frequency: String::new(),
            status: ScheduleStatus::OnTime,
            start_stop_id: None,
            end_stop_id: None,
        }
    }

    pub fn starting_at(mut self, stop: impl Into<StopIdentifier>) -> Self {
        self.start_stop_id = Some(stop.into());
        self
    }

    pub fn ending_at(mut self, stop: impl Into<StopIdentifier>) -> Self {
        self.end_stop_id = Some(stop.into());
        self
    }

    pub fn with_status(mut self, status: ScheduleStatus) -> Self {
        self.status = status;
        self
    }
}
