//! # busline-transit
//!
//! Schedule-driven bus position simulation.
//!
//! ## Features
//!
//! - **Path measurement**: Great-circle lengths over explicit, provided or stop geometry
//! - **Schedule indexing**: 12-hour timetable entries turned into per-route trip windows
//! - **Position simulation**: Where each bus should be, its heading and speed, for any time of day
//! - **Next-stop ETA**: Projection of a simulated or live position onto the route's stops
//! - **Spatial queries**: R-tree backed nearest and radius stop lookups
//! - **Pluggable ticking**: Real-time intervals or virtual stepped clocks
//!
//! ## Example
//!
//! ```
//! use busline_transit::prelude::*;
//! use std::sync::Arc;
//!
//! let route = Route::new(
//!     "route-1",
//!     vec![
//!         Stop::new("s1", "New Bus Stand", Coordinate::new(11.1085, 77.3411)),
//!         Stop::new("s10", "Palladam Bus Stand", Coordinate::new(10.9913, 77.2863)),
//!     ],
//! );
//! let schedule = vec![ScheduleEntry::new("sch-1", "route-1", "8:00 AM", "9:00 AM").starting_at("s1")];
//! let catalog = Arc::new(StaticCatalog::from_data(vec![route], schedule));
//!
//! let clock = Arc::new(ManualClock::new(8 * 3600 + 30 * 60)); // 8:30 AM
//! let bus = VehicleState::new("bus-1", "route-1", Coordinate::new(11.1085, 77.3411));
//! let mut simulator = Simulator::new(catalog, vec![bus], clock);
//!
//! let report = simulator.tick();
//! assert_eq!(report.updated, 1);
//!
//! let bus = simulator.store().get(&VehicleIdentifier::new("bus-1")).unwrap();
//! assert!(bus.is_active);
//! assert!(bus.speed_kmh >= 5.0);
//!
//! let next = simulator.next_stop(&VehicleIdentifier::new("bus-1")).unwrap();
//! assert_eq!(next.name, "Palladam Bus Stand");
//! ```

pub mod eta;
pub mod identifiers;
pub mod models;
pub mod path;
pub mod provider;
pub mod schedule;
pub mod simulation;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::eta::{Eta, NextStop};
    pub use crate::identifiers::*;
    pub use crate::models::{
        Coordinate, Direction, OccupancyLevel, Result, Route, ScheduleEntry, ScheduleStatus, Stop, TransitError,
    };
    pub use crate::path::{GeometryProvider, MeasuredPath, RoutePaths, StraightLines};
    pub use crate::provider::StaticCatalog;
    pub use crate::schedule::{format_clock_time, parse_clock_time, TimetableFilter, TimetableTab, TripWindow};
    pub use crate::simulation::{
        Clock, IntervalTicker, ManualClock, Simulator, SteppedTicker, StopHandle, SystemClock, TickReport,
        TickSource, VehicleState, VehicleStore,
    };
}

pub use prelude::*;
