use anyhow::{Context, Result};
use busline_transit::prelude::*;
use geo::LineString;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use std::path::Path;

/// Convert a geo LineString to GeoJSON Value
fn line_string_to_geojson(line: &LineString<f64>) -> Value {
    Value::LineString(line.0.iter().map(|c| vec![c.x, c.y]).collect())
}

/// Create a GeoJSON Feature for a route's forward path
fn route_to_feature(route: &Route, path: &MeasuredPath) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("feature_type".to_string(), serde_json::json!("route"));
    properties.insert("route_id".to_string(), serde_json::json!(route.id.as_str()));
    properties.insert("number".to_string(), serde_json::json!(route.number));
    properties.insert("name".to_string(), serde_json::json!(route.name));
    properties.insert("length_m".to_string(), serde_json::json!(path.total_length()));
    if let Some(color) = &route.color {
        properties.insert("stroke".to_string(), serde_json::json!(color));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(line_string_to_geojson(&path.to_line_string()))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Create a GeoJSON point Feature for a vehicle
fn vehicle_to_feature(vehicle: &VehicleState) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("feature_type".to_string(), serde_json::json!("vehicle"));
    properties.insert("vehicle_id".to_string(), serde_json::json!(vehicle.id.as_str()));
    properties.insert("route_id".to_string(), serde_json::json!(vehicle.route_id.as_str()));
    properties.insert("heading".to_string(), serde_json::json!(vehicle.heading));
    properties.insert("speed_kmh".to_string(), serde_json::json!(vehicle.speed_kmh));
    properties.insert("occupancy".to_string(), serde_json::json!(vehicle.occupancy.label()));
    properties.insert("is_active".to_string(), serde_json::json!(vehicle.is_active));

    let point = vec![vehicle.coordinate.longitude, vehicle.coordinate.latitude];

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(point))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Route polylines followed by vehicle points
pub fn snapshot_collection(catalog: &StaticCatalog, vehicles: &[VehicleState]) -> FeatureCollection {
    let routes = catalog
        .routes()
        .filter_map(|route| catalog.paths(&route.id).map(|paths| route_to_feature(route, &paths.forward)));

    FeatureCollection {
        bbox: None,
        features: routes.chain(vehicles.iter().map(vehicle_to_feature)).collect(),
        foreign_members: None,
    }
}

/// Write routes and vehicle positions to a GeoJSON file
pub fn write_snapshot_geojson(catalog: &StaticCatalog, vehicles: &[VehicleState], output_path: &Path) -> Result<()> {
    log::info!("Writing {} vehicles to {}", vehicles.len(), output_path.display());

    let geojson = GeoJson::from(snapshot_collection(catalog, vehicles));
    let json_string = serde_json::to_string_pretty(&geojson).context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}
