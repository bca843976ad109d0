//! The tick driver: owns vehicle state and recomputes it from the catalog.

use std::sync::Arc;

use crate::eta::{self, NextStop};
use crate::identifiers::*;
use crate::models::{Coordinate, Result, TransitError};
use crate::provider::StaticCatalog;
use crate::simulation::clock::Clock;
use crate::simulation::position::simulate;
use crate::simulation::store::{VehicleState, VehicleStore};
use crate::simulation::ticker::TickSource;

/// Outcome of one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Time of day the tick was computed for
    pub now_seconds: u32,
    /// Vehicles that received a new position
    pub updated: usize,
    /// Vehicles left at their last known state
    pub held: usize,
}

pub struct Simulator {
    catalog: Arc<StaticCatalog>,
    store: VehicleStore,
    clock: Arc<dyn Clock>,
}

impl Simulator {
    pub fn new(catalog: Arc<StaticCatalog>, vehicles: impl IntoIterator<Item = VehicleState>, clock: Arc<dyn Clock>) -> Self {
        let store = VehicleStore::new(vehicles);

        for vehicle in store.iter() {
            if !catalog.is_simulated(&vehicle.route_id) {
                tracing::warn!(
                    vehicle = %vehicle.id,
                    route = %vehicle.route_id,
                    "vehicle is assigned to a route that cannot be simulated; it will not move"
                );
            }
        }

        Self { catalog, store, clock }
    }

    pub fn catalog(&self) -> &StaticCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &VehicleStore {
        &self.store
    }

    /// Overwrite a vehicle's position with an observed fix, e.g. from live GPS.
    ///
    /// The next tick recomputes the vehicle from the schedule again.
    pub fn apply_position(
        &mut self,
        id: &VehicleIdentifier,
        coordinate: Coordinate,
        heading: Option<f64>,
        speed_kmh: Option<f64>,
    ) -> Result<()> {
        self.store.apply_position(id, coordinate, heading, speed_kmh)
    }

    /// Recompute every vehicle once for the clock's current time
    pub fn tick(&mut self) -> TickReport {
        let now_seconds = self.clock.seconds_since_midnight();
        let mut report = TickReport {
            now_seconds,
            ..Default::default()
        };

        for vehicle in self.store.iter_mut() {
            if step_vehicle(&self.catalog, vehicle, now_seconds) {
                report.updated += 1;
            } else {
                report.held += 1;
            }
        }

        tracing::trace!(now_seconds, updated = report.updated, held = report.held, "tick");
        report
    }

    /// Tick whenever `source` delivers, calling `on_tick` after each one.
    ///
    /// Returns the number of ticks processed once the source stops.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_tick: F) -> u64
    where
        S: TickSource + ?Sized,
        F: FnMut(&TickReport, &VehicleStore),
    {
        let mut ticks = 0;
        while source.wait_for_tick() {
            let report = self.tick();
            on_tick(&report, &self.store);
            ticks += 1;
        }

        tracing::debug!(ticks, vehicles = self.store.len(), "simulation run finished");
        ticks
    }

    /// Next stop and ETA for one vehicle at the clock's current time
    pub fn next_stop(&self, id: &VehicleIdentifier) -> Result<NextStop> {
        let vehicle = self
            .store
            .get(id)
            .ok_or_else(|| TransitError::VehicleNotFound(id.clone()))?;

        let lines = self
            .catalog
            .stop_lines(&vehicle.route_id)
            .ok_or_else(|| TransitError::RouteNotFound(vehicle.route_id.clone()))?;

        eta::next_stop(
            lines,
            self.catalog.trip_windows(&vehicle.route_id),
            vehicle.coordinate,
            vehicle.speed_kmh,
            self.clock.seconds_since_midnight(),
        )
        .ok_or_else(|| TransitError::InvalidData(format!("route {} has no stops", vehicle.route_id)))
    }
}

/// Move one vehicle to where its schedule says it should be.
///
/// Returns `false` when the vehicle is held: unknown or unsimulated route, no
/// trip windows, or a zero-length path.
fn step_vehicle(catalog: &StaticCatalog, vehicle: &mut VehicleState, now_seconds: u32) -> bool {
    let Some(paths) = catalog.paths(&vehicle.route_id) else {
        return false;
    };

    let Some(motion) = simulate(catalog.trip_windows(&vehicle.route_id), paths, now_seconds) else {
        return false;
    };

    vehicle.coordinate = motion.coordinate;
    vehicle.heading = motion.heading;
    vehicle.speed_kmh = motion.speed_kmh;
    vehicle.is_active = motion.trip.is_active();
    true
}
