//! Schedule parsing and indexing.

pub mod index;
pub mod time;
pub mod timetable;

pub use index::{resolve_direction, ScheduleIndex, TripWindow};
pub use time::{format_clock_time, parse_clock_time, SECONDS_PER_DAY};
pub use timetable::{TimetableFilter, TimetableTab};
