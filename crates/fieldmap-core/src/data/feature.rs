//! User-drawn features.
//!
//! Geometry invariants are enforced at construction: a [`Path`] always has
//! at least two vertices and a [`Ring`] is always closed with at least three
//! distinct corners.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use super::Vertex;

/// Stable identity of a drawn feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    /// Wrap an existing id string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle a presenter returns for a rendered overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// Geometry kind of a finalized feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Single position
    Point,
    /// Open path
    LineString,
    /// Closed ring
    Polygon,
}

impl FeatureKind {
    /// GeoJSON geometry type name
    pub fn geojson_type(self) -> &'static str {
        match self {
            FeatureKind::Point => "Point",
            FeatureKind::LineString => "LineString",
            FeatureKind::Polygon => "Polygon",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.geojson_type())
    }
}

/// An open path of at least two vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vertex>", into = "Vec<Vertex>")]
pub struct Path(Vec<Vertex>);

impl Path {
    /// Minimum number of vertices
    pub const MIN_VERTICES: usize = 2;

    /// Build a path, `None` below the minimum vertex count
    pub fn new(vertices: Vec<Vertex>) -> Option<Self> {
        (vertices.len() >= Self::MIN_VERTICES).then_some(Self(vertices))
    }

    /// Path vertices
    pub fn vertices(&self) -> &[Vertex] {
        &self.0
    }
}

impl TryFrom<Vec<Vertex>> for Path {
    type Error = String;

    fn try_from(vertices: Vec<Vertex>) -> Result<Self, Self::Error> {
        let count = vertices.len();
        Self::new(vertices).ok_or_else(|| format!("path needs 2 vertices, got {count}"))
    }
}

impl From<Path> for Vec<Vertex> {
    fn from(path: Path) -> Self {
        path.0
    }
}

/// A closed polygon ring: first vertex repeated as last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vertex>", into = "Vec<Vertex>")]
pub struct Ring(Vec<Vertex>);

impl Ring {
    /// Minimum number of distinct corners
    pub const MIN_CORNERS: usize = 3;

    /// Close a list of corners into a ring.
    ///
    /// The first vertex is appended unless the input is already closed.
    /// `None` when fewer than three corners remain.
    pub fn close(mut corners: Vec<Vertex>) -> Option<Self> {
        if corners.len() > 1 && corners.first() == corners.last() {
            corners.pop();
        }
        if corners.len() < Self::MIN_CORNERS {
            return None;
        }
        let first = corners[0];
        corners.push(first);
        Some(Self(corners))
    }

    /// Ring from a drawn buffer, taken as-is.
    ///
    /// The first vertex is always appended, even when the last click
    /// landed on it, so every click stays a corner. `None` below three
    /// corners.
    pub fn from_corners(mut corners: Vec<Vertex>) -> Option<Self> {
        if corners.len() < Self::MIN_CORNERS {
            return None;
        }
        let first = corners[0];
        corners.push(first);
        Some(Self(corners))
    }

    /// Ring vertices, closing vertex included
    pub fn vertices(&self) -> &[Vertex] {
        &self.0
    }

    /// Distinct corners, closing vertex excluded
    pub fn corners(&self) -> &[Vertex] {
        &self.0[..self.0.len() - 1]
    }
}

impl TryFrom<Vec<Vertex>> for Ring {
    type Error = String;

    fn try_from(vertices: Vec<Vertex>) -> Result<Self, Self::Error> {
        let count = vertices.len();
        Self::close(vertices).ok_or_else(|| format!("ring needs 3 corners, got {count} vertices"))
    }
}

impl From<Ring> for Vec<Vertex> {
    fn from(ring: Ring) -> Self {
        ring.0
    }
}

/// Tagged geometry of a drawn feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureGeometry {
    /// Single position
    Point(Vertex),
    /// Open path
    LineString(Path),
    /// Polygon with its exterior ring
    Polygon(Ring),
}

impl FeatureGeometry {
    /// Geometry kind
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureGeometry::Point(_) => FeatureKind::Point,
            FeatureGeometry::LineString(_) => FeatureKind::LineString,
            FeatureGeometry::Polygon(_) => FeatureKind::Polygon,
        }
    }

    /// GeoJSON coordinates in `[lon, lat]` order
    pub fn coordinates(&self) -> Value {
        match self {
            FeatureGeometry::Point(v) => json!(v.to_lon_lat()),
            FeatureGeometry::LineString(path) => json!(lon_lat_list(path.vertices())),
            FeatureGeometry::Polygon(ring) => json!([lon_lat_list(ring.vertices())]),
        }
    }

    /// GeoJSON geometry object
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": self.kind().geojson_type(),
            "coordinates": self.coordinates(),
        })
    }
}

fn lon_lat_list(vertices: &[Vertex]) -> Vec<[f64; 2]> {
    vertices.iter().map(|v| v.to_lon_lat()).collect()
}

/// Display and classification properties of a drawn feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Formatted measurement (area, length, or coordinate)
    pub measurement: String,
    /// Category label chosen when the feature was drawn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Stroke/fill color as a hex string
    pub color: String,
}

/// A finalized, user-drawn feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawnFeature {
    /// Unique id within the store
    pub id: FeatureId,
    /// Construction-checked geometry
    pub geometry: FeatureGeometry,
    /// Measurement, category, and color
    pub properties: FeatureProperties,
    /// Presenter overlay, absent until rendered
    #[serde(skip)]
    pub render_handle: Option<RenderHandle>,
}

impl DrawnFeature {
    /// Geometry kind
    pub fn kind(&self) -> FeatureKind {
        self.geometry.kind()
    }

    /// GeoJSON `Feature` object. The render handle is never exported.
    pub fn to_geojson(&self) -> Value {
        let mut properties = json!({
            "measurement": self.properties.measurement,
            "color": self.properties.color,
        });
        if let Some(category) = &self.properties.category {
            properties["category"] = json!(category);
        }
        json!({
            "type": "Feature",
            "id": self.id.as_str(),
            "geometry": self.geometry.to_geojson(),
            "properties": properties,
        })
    }
}

impl PartialEq for DrawnFeature {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.geometry == other.geometry
            && self.properties == other.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> Vec<Vertex> {
        vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(0.0, 1.0),
            Vertex::new(1.0, 1.0),
        ]
    }

    #[test]
    fn test_path_minimum() {
        assert!(Path::new(vec![Vertex::new(0.0, 0.0)]).is_none());
        assert!(Path::new(vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)]).is_some());
    }

    #[test]
    fn test_ring_closes() {
        let ring = Ring::close(corners()).expect("three corners");
        assert_eq!(ring.vertices().len(), 4);
        assert_eq!(ring.vertices().first(), ring.vertices().last());
        assert_eq!(ring.corners().len(), 3);
    }

    #[test]
    fn test_ring_does_not_double_close() {
        let mut closed = corners();
        closed.push(closed[0]);
        let ring = Ring::close(closed).expect("already closed");
        assert_eq!(ring.vertices().len(), 4);
    }

    #[test]
    fn test_ring_from_corners_keeps_repeated_first_click() {
        let a = Vertex::new(0.0, 0.0);
        let b = Vertex::new(0.0, 1.0);
        let ring = Ring::from_corners(vec![a, b, a]).expect("three clicks");
        assert_eq!(ring.vertices(), &[a, b, a, a]);
        assert_eq!(ring.corners().len(), 3);

        assert!(Ring::from_corners(vec![a, b]).is_none());
    }

    #[test]
    fn test_ring_rejects_two_corners() {
        assert!(Ring::close(corners()[..2].to_vec()).is_none());
    }

    #[test]
    fn test_ring_deserialize_checks_invariant() {
        let bad: Result<Ring, _> = serde_json::from_value(json!([{"lat": 0.0, "lng": 0.0}]));
        assert!(bad.is_err());
    }

    #[test]
    fn test_geojson_polygon_coordinates() {
        let geometry = FeatureGeometry::Polygon(Ring::close(corners()).expect("ring"));
        let value = geometry.to_geojson();
        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"][0][1], json!([1.0, 0.0]));
        assert_eq!(value["coordinates"][0][3], value["coordinates"][0][0]);
    }

    #[test]
    fn test_feature_geojson_omits_missing_category() {
        let feature = DrawnFeature {
            id: FeatureId::new("feat-1"),
            geometry: FeatureGeometry::Point(Vertex::new(48.0, 2.0)),
            properties: FeatureProperties {
                measurement: "2.000000, 48.000000".to_string(),
                category: None,
                color: "#3388ff".to_string(),
            },
            render_handle: Some(RenderHandle(7)),
        };
        let value = feature.to_geojson();
        assert_eq!(value["id"], "feat-1");
        assert!(value["properties"].get("category").is_none());
        assert!(value.get("render_handle").is_none());
    }
}
