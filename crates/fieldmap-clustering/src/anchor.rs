//! Marker anchor extraction for backend objects.

use fieldmap_core::{geodesy, MapObject, ObjectGeometry, Vertex};

/// Position a marker for `object` is placed at.
///
/// - Point: its coordinate.
/// - Polygon: the backend-supplied center, else the mean of the exterior
///   ring's vertices.
/// - LineString: the vertex at index `len / 2` (not a distance midpoint).
///
/// `None` for unsupported or malformed geometry.
pub fn anchor(object: &MapObject) -> Option<Vertex> {
    let vertex = match &object.geometry {
        ObjectGeometry::Point(v) => Some(*v),
        ObjectGeometry::Polygon(rings) => object
            .center
            .or_else(|| rings.first().and_then(|ring| geodesy::ring_centroid(ring))),
        ObjectGeometry::LineString(vertices) => vertices.get(vertices.len() / 2).copied(),
        ObjectGeometry::Unsupported(_) => None,
    }?;
    is_finite(vertex).then_some(vertex)
}

fn is_finite(vertex: Vertex) -> bool {
    vertex.lat.is_finite() && vertex.lng.is_finite()
}
