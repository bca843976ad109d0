//! Core value types and errors shared by every layer of the engine.

use std::fmt;

use crate::identifiers::*;

// ============================================================================
// Values
// ============================================================================

/// A WGS84 position in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<Coordinate> for geo::Coord {
    fn from(c: Coordinate) -> Self {
        geo::Coord {
            x: c.longitude,
            y: c.latitude,
        }
    }
}

impl From<geo::Coord> for Coordinate {
    fn from(c: geo::Coord) -> Self {
        Self::new(c.y, c.x)
    }
}

impl From<Coordinate> for geo::Point {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

impl From<geo::Point> for Coordinate {
    fn from(p: geo::Point) -> Self {
        Self::new(p.y(), p.x())
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Which way a trip traverses its route's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// How full a vehicle is. Reported alongside position, never simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OccupancyLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl OccupancyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Crowd",
            Self::Medium => "Moderate",
            Self::High => "Crowded",
        }
    }
}

impl fmt::Display for OccupancyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Route not found: {0}")]
    RouteNotFound(RouteIdentifier),

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(VehicleIdentifier),

    #[error("Route {route} has {points} usable geometry point(s), at least 2 are required")]
    InsufficientGeometry { route: RouteIdentifier, points: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_geo_conversion() {
        let c = Coordinate::new(11.132, 77.341);
        let p: geo::Point = c.into();
        assert_eq!(p.x(), 77.341);
        assert_eq!(p.y(), 11.132);
        assert_eq!(Coordinate::from(p), c);
    }

    #[test]
    fn test_direction_reversed() {
        assert_eq!(Direction::Forward.reversed(), Direction::Reverse);
        assert_eq!(Direction::Reverse.reversed(), Direction::Forward);
    }

    #[test]
    fn test_occupancy_label() {
        assert_eq!(OccupancyLevel::Medium.to_string(), "Moderate");
    }

    #[test]
    fn test_error_display() {
        let err = TransitError::InsufficientGeometry {
            route: RouteIdentifier::new("route-9"),
            points: 1,
        };
        assert_eq!(
            err.to_string(),
            "Route route-9 has 1 usable geometry point(s), at least 2 are required"
        );
    }
}
