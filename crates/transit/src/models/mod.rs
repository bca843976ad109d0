//! Transit data models and types.

pub mod route;
pub mod schedule;
pub mod types;

// Re-exports for convenience
pub use route::{Route, Stop};
pub use schedule::{ScheduleEntry, ScheduleStatus};
pub use types::{Coordinate, Direction, OccupancyLevel, Result, TransitError};
