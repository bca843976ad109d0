//! Schedule-driven vehicle simulation.
//!
//! [`position`] holds the pure per-vehicle math; [`driver::Simulator`] applies
//! it to every vehicle on each tick delivered by a [`ticker::TickSource`].

pub mod clock;
pub mod driver;
pub mod position;
pub mod store;
pub mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{Simulator, TickReport};
pub use position::{locate, select_trip, simulate, Motion, TripPhase, TripSelection};
pub use store::{VehicleState, VehicleStore};
pub use ticker::{IntervalTicker, StopHandle, SteppedTicker, TickSource};
