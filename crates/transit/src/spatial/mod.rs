//! Geo math and spatial indexing.

pub mod index;
pub mod queries;

pub use index::{NearbyStop, StopIndex, StopNode};
pub use queries::{bearing, distance, lerp, project_onto_segment, SegmentProjection};
