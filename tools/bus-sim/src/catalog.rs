use anyhow::{bail, Context, Result};
use busline_transit::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// The on-disk catalog: routes, timetable and the fleet
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub routes: Vec<Route>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
    #[serde(default)]
    pub vehicles: Vec<VehicleConfig>,
}

/// A vehicle as configured. Without a coordinate it starts at its route's first stop.
#[derive(Debug, Deserialize)]
pub struct VehicleConfig {
    pub id: VehicleIdentifier,
    pub route_id: RouteIdentifier,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub occupancy: OccupancyLevel,
}

pub fn read_catalog(path: &Path) -> Result<CatalogFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    parse_catalog(&content).with_context(|| format!("Failed to parse catalog from: {}", path.display()))
}

pub fn parse_catalog(content: &str) -> Result<CatalogFile> {
    let catalog: CatalogFile = serde_json::from_str(content)?;
    if catalog.routes.is_empty() {
        bail!("Catalog has no routes");
    }
    Ok(catalog)
}

/// Turn configured vehicles into initial state, placing unpositioned ones at
/// the start of their route
pub fn initial_vehicles(configs: Vec<VehicleConfig>, catalog: &StaticCatalog) -> Result<Vec<VehicleState>> {
    configs
        .into_iter()
        .map(|config| {
            let coordinate = match config.coordinate {
                Some(coordinate) => coordinate,
                None => start_of_route(catalog, &config.route_id).with_context(|| {
                    format!("Vehicle {} has no coordinate and route {} has no start", config.id, config.route_id)
                })?,
            };

            Ok(VehicleState::new(config.id, config.route_id, coordinate).with_occupancy(config.occupancy))
        })
        .collect()
}

fn start_of_route(catalog: &StaticCatalog, route_id: &RouteIdentifier) -> Option<Coordinate> {
    if let Some(paths) = catalog.paths(route_id) {
        return Some(paths.forward.first());
    }
    catalog
        .route(route_id)
        .and_then(|route| route.stops.first())
        .map(|stop| stop.coordinate)
}
