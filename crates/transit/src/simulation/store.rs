//! Vehicle state, owned by the simulation driver.

use std::collections::HashMap;

use crate::identifiers::*;
use crate::models::{Coordinate, OccupancyLevel, Result, TransitError};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleState {
    pub id: VehicleIdentifier,
    pub route_id: RouteIdentifier,
    pub coordinate: Coordinate,
    /// Degrees in [0, 360)
    #[cfg_attr(feature = "serde", serde(default))]
    pub heading: f64,
    /// km/h, never negative
    #[cfg_attr(feature = "serde", serde(default))]
    pub speed_kmh: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub occupancy: OccupancyLevel,
    /// Whether the last update placed the vehicle on an active trip
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_active: bool,
}

impl VehicleState {
    pub fn new(id: impl Into<VehicleIdentifier>, route_id: impl Into<RouteIdentifier>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            route_id: route_id.into(),
            coordinate,
            heading: 0.0,
            speed_kmh: 0.0,
            occupancy: OccupancyLevel::default(),
            is_active: false,
        }
    }

    pub fn with_occupancy(mut self, occupancy: OccupancyLevel) -> Self {
        self.occupancy = occupancy;
        self
    }
}

/// Every tracked vehicle, in insertion order.
///
/// Consumers get shared references or owned snapshots; only the driver mutates.
/// Observed fixes go through [`Simulator::apply_position`](crate::simulation::Simulator::apply_position).
#[derive(Clone, Debug, Default)]
pub struct VehicleStore {
    vehicles: Vec<VehicleState>,
    by_id: HashMap<VehicleIdentifier, usize>,
}

impl VehicleStore {
    pub fn new(vehicles: impl IntoIterator<Item = VehicleState>) -> Self {
        let mut store = Self::default();
        for vehicle in vehicles {
            store.insert(vehicle);
        }
        store
    }

    /// Add a vehicle, replacing any existing one with the same id
    pub(crate) fn insert(&mut self, vehicle: VehicleState) {
        match self.by_id.get(&vehicle.id) {
            Some(&slot) => self.vehicles[slot] = vehicle,
            None => {
                self.by_id.insert(vehicle.id.clone(), self.vehicles.len());
                self.vehicles.push(vehicle);
            }
        }
    }

    pub fn get(&self, id: &VehicleIdentifier) -> Option<&VehicleState> {
        self.by_id.get(id).map(|&slot| &self.vehicles[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleState> + '_ {
        self.vehicles.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut VehicleState> + '_ {
        self.vehicles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Owned copy of every vehicle
    pub fn snapshot(&self) -> Vec<VehicleState> {
        self.vehicles.clone()
    }

    /// Owned copy of the vehicles on any of `routes`; an empty filter keeps all
    pub fn snapshot_for_routes(&self, routes: &[RouteIdentifier]) -> Vec<VehicleState> {
        self.vehicles
            .iter()
            .filter(|v| routes.is_empty() || routes.contains(&v.route_id))
            .cloned()
            .collect()
    }

    /// Overwrite a vehicle's position with an observed fix
    pub(crate) fn apply_position(
        &mut self,
        id: &VehicleIdentifier,
        coordinate: Coordinate,
        heading: Option<f64>,
        speed_kmh: Option<f64>,
    ) -> Result<()> {
        let slot = *self
            .by_id
            .get(id)
            .ok_or_else(|| TransitError::VehicleNotFound(id.clone()))?;

        if !coordinate.is_finite() {
            return Err(TransitError::InvalidData(format!(
                "non-finite position for vehicle {id}"
            )));
        }

        let vehicle = &mut self.vehicles[slot];
        vehicle.coordinate = coordinate;
        if let Some(heading) = heading.filter(|h| h.is_finite()) {
            vehicle.heading = heading.rem_euclid(360.0);
        }
        if let Some(speed) = speed_kmh.filter(|s| s.is_finite()) {
            vehicle.speed_kmh = speed.max(0.0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> VehicleStore {
        VehicleStore::new(vec![
            VehicleState::new("bus-1", "route-1", Coordinate::new(11.13, 77.34)),
            VehicleState::new("bus-2", "route-2", Coordinate::new(11.00, 77.28))
                .with_occupancy(OccupancyLevel::High),
            VehicleState::new("bus-3", "route-1", Coordinate::new(11.10, 77.34)),
        ])
    }

    #[test]
    fn test_lookup_and_order() {
        let store = store();
        assert_eq!(store.len(), 3);
        let ids: Vec<&str> = store.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["bus-1", "bus-2", "bus-3"]);
        assert_eq!(
            store.get(&"bus-2".into()).map(|v| v.occupancy),
            Some(OccupancyLevel::High)
        );
        assert!(store.get(&"bus-9".into()).is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut store = store();
        store.insert(VehicleState::new("bus-1", "route-2", Coordinate::new(0.0, 0.0)));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&"bus-1".into()).unwrap().route_id.as_str(), "route-2");
    }

    #[test]
    fn test_snapshot_for_routes() {
        let store = store();
        assert_eq!(store.snapshot_for_routes(&[]).len(), 3);

        let route_one = store.snapshot_for_routes(&[RouteIdentifier::new("route-1")]);
        let ids: Vec<&str> = route_one.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["bus-1", "bus-3"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = store();
        let before = store.snapshot();
        store
            .apply_position(&"bus-1".into(), Coordinate::new(1.0, 2.0), None, None)
            .unwrap();
        assert_eq!(before[0].coordinate, Coordinate::new(11.13, 77.34));
        assert_eq!(store.get(&"bus-1".into()).unwrap().coordinate, Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn test_apply_position_validation() {
        let mut store = store();
        let id = VehicleIdentifier::new("bus-1");

        store
            .apply_position(&id, Coordinate::new(11.0, 77.0), Some(-90.0), Some(-3.0))
            .unwrap();
        let vehicle = store.get(&id).unwrap();
        assert_eq!(vehicle.heading, 270.0);
        assert_eq!(vehicle.speed_kmh, 0.0);

        assert!(matches!(
            store.apply_position(&"ghost".into(), Coordinate::new(0.0, 0.0), None, None),
            Err(TransitError::VehicleNotFound(_))
        ));
        assert!(matches!(
            store.apply_position(&id, Coordinate::new(f64::NAN, 0.0), None, None),
            Err(TransitError::InvalidData(_))
        ));
    }
}
