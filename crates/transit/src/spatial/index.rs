//! R-tree over boarding stops.
//!
//! ## Two-Stage Filtering
//!
//! Radius queries first filter in degree space inside the R-tree, widening the
//! longitude extent by `1 / cos(latitude)` so nothing within the radius is missed,
//! then apply the haversine distance to the survivors.

use geo::Point;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::identifiers::*;
use crate::models::types::Coordinate;
use crate::spatial::queries::{distance, meters_to_degrees_approx, EARTH_RADIUS_M};

/// Keeps the longitude widening finite near the poles
const MIN_COS_LATITUDE: f64 = 0.01;

#[derive(Clone, Debug)]
pub struct StopNode {
    pub route_id: RouteIdentifier,
    pub stop_id: StopIdentifier,
    pub coordinate: Coordinate,
    point: [f64; 2],
}

impl StopNode {
    pub fn new(route_id: RouteIdentifier, stop_id: StopIdentifier, coordinate: Coordinate) -> Self {
        let location: Point = coordinate.into();
        Self {
            route_id,
            stop_id,
            coordinate,
            point: [location.x(), location.y()],
        }
    }
}

impl RTreeObject for StopNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StopNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// A stop matched by a spatial query, with its great-circle distance in meters
#[derive(Clone, Debug)]
pub struct NearbyStop<'a> {
    pub node: &'a StopNode,
    pub distance_m: f64,
}

#[derive(Default)]
pub struct StopIndex {
    tree: RTree<StopNode>,
}

impl StopIndex {
    pub fn new(nodes: Vec<StopNode>) -> Self {
        Self {
            tree: RTree::bulk_load(nodes),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Stops within `radius_m` meters, nearest first
    pub fn stops_near(&self, coordinate: Coordinate, radius_m: f64) -> Vec<NearbyStop<'_>> {
        if radius_m <= 0.0 || !radius_m.is_finite() || !coordinate.is_finite() {
            return Vec::new();
        }

        let cos_lat = coordinate.latitude.to_radians().cos().abs().max(MIN_COS_LATITUDE);
        let radius_deg = meters_to_degrees_approx(radius_m) / cos_lat;
        let query: Point = coordinate.into();

        let mut nearby: Vec<NearbyStop<'_>> = self
            .tree
            .locate_within_distance([query.x(), query.y()], radius_deg * radius_deg)
            .map(|node| NearbyStop {
                node,
                distance_m: distance(coordinate, node.coordinate),
            })
            .filter(|n| n.distance_m <= radius_m)
            .collect();

        nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        nearby
    }

    /// Nearest stop by great-circle distance.
    ///
    /// The R-tree orders candidates by degree distance, which overstates
    /// east-west spacing away from the equator. Candidates are pulled until the
    /// smallest distance the next one could have in meters exceeds the best
    /// haversine distance found so far.
    pub fn nearest_stop(&self, coordinate: Coordinate) -> Option<NearbyStop<'_>> {
        if !coordinate.is_finite() {
            return None;
        }

        let query: Point = coordinate.into();
        let mut best: Option<NearbyStop<'_>> = None;

        for (node, distance_2) in self.tree.nearest_neighbor_iter_with_distance_2(&[query.x(), query.y()]) {
            let degrees = distance_2.sqrt();
            if let Some(best) = &best {
                if lower_bound_m(coordinate, degrees) > best.distance_m {
                    break;
                }
            }

            let distance_m = distance(coordinate, node.coordinate);
            if best.as_ref().map_or(true, |b| distance_m < b.distance_m) {
                best = Some(NearbyStop { node, distance_m });
            }
        }

        best
    }
}

/// Shortest great-circle distance a point `degrees` away (in degree space) can be.
///
/// Longitude shrinks by `cos(latitude)`, taken at the most poleward latitude
/// such a point can reach.
fn lower_bound_m(origin: Coordinate, degrees: f64) -> f64 {
    let farthest_latitude = (origin.latitude.abs() + degrees).min(90.0);
    let cos_lat = farthest_latitude.to_radians().cos().max(MIN_COS_LATITUDE);
    degrees.to_radians() * EARTH_RADIUS_M * cos_lat
}
