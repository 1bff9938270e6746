//! Data models shared by the drawing, clustering, and fetch layers
//!
//! This module provides:
//! - Geographic vertices and bounding boxes
//! - Drawn features with construction-checked geometry
//! - Backend map objects and cluster groups
//! - The legend (category label, backend key, and color table)

mod feature;
mod legend;
mod object;

pub use feature::{
    DrawnFeature, FeatureGeometry, FeatureId, FeatureKind, FeatureProperties, Path, RenderHandle,
    Ring,
};
pub use legend::{Legend, LegendEntry};
pub use object::{ClusterGroup, ClusterSet, MapObject, ObjectGeometry, ObjectKey};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Vertex {
    /// Create a vertex from latitude and longitude
    pub fn new(lat: f64, lng: f64) -> Self {
        debug_assert!(
            lat.is_finite() && lng.is_finite(),
            "Vertex must be finite: lat={lat}, lng={lng}"
        );
        Self { lat, lng }
    }

    /// Create a vertex from a GeoJSON `[lon, lat]` position
    pub fn from_lon_lat(position: [f64; 2]) -> Self {
        Self::new(position[1], position[0])
    }

    /// GeoJSON `[lon, lat]` position
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Geographic bounding box (west, south, east, north) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Minimum longitude
    pub west: f64,
    /// Minimum latitude
    pub south: f64,
    /// Maximum longitude
    pub east: f64,
    /// Maximum latitude
    pub north: f64,
}

impl GeoBounds {
    /// Create a bounding box
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Whether the vertex lies inside (edges included)
    pub fn contains(&self, vertex: Vertex) -> bool {
        vertex.lng >= self.west
            && vertex.lng <= self.east
            && vertex.lat >= self.south
            && vertex.lat <= self.north
    }

    /// Center of the box
    pub fn center(&self) -> Vertex {
        Vertex::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// `west,south,east,north` as sent in the `bbox` query parameter
    pub fn to_query_value(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}
