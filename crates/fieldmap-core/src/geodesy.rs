//! Measurements over geographic coordinates.
//!
//! Area uses an equirectangular local-meters approximation followed by the
//! shoelace formula. It is accurate enough for facility-scale polygons
//! (sub-kilometer) and must not be used for shapes spanning large latitude
//! ranges: each vertex is scaled by the cosine of its own latitude, so the
//! error grows with the north-south extent of the shape.
//!
//! Length is the sum of haversine distances between consecutive vertices.

use crate::constants::{
    EARTH_RADIUS_M, HECTARE_THRESHOLD_M2, KILOMETER_THRESHOLD_M, METERS_PER_DEGREE,
};
use crate::data::{FeatureGeometry, Vertex};

/// Area of a polygon in square meters.
///
/// Returns 0 for fewer than 3 vertices. The ring may be open or closed;
/// a repeated closing vertex contributes nothing to the sum.
pub fn polygon_area(vertices: &[Vertex]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }

    let projected: Vec<(f64, f64)> = vertices.iter().map(|v| project_local(*v)).collect();
    let n = projected.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (x1, y1) = projected[i];
        let (x2, y2) = projected[(i + 1) % n];
        sum += x1 * y2 - x2 * y1;
    }

    sum.abs() / 2.0
}

/// Length of a path in meters.
///
/// Returns 0 for fewer than 2 vertices.
pub fn polyline_length(vertices: &[Vertex]) -> f64 {
    if vertices.len() < 2 {
        return 0.0;
    }

    vertices
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}

/// Great-circle distance between two vertices in meters.
pub fn haversine_distance(a: Vertex, b: Vertex) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Formats an area: square meters below one hectare, hectares at or above.
pub fn format_area(m2: f64) -> String {
    if m2 >= HECTARE_THRESHOLD_M2 {
        format!("{:.2} ha", m2 / HECTARE_THRESHOLD_M2)
    } else {
        format!("{:.2} m²", m2)
    }
}

/// Formats a length: meters below one kilometer, kilometers at or above.
pub fn format_length(m: f64) -> String {
    if m >= KILOMETER_THRESHOLD_M {
        format!("{:.2} km", m / KILOMETER_THRESHOLD_M)
    } else {
        format!("{:.2} m", m)
    }
}

/// Formats a single position as `lon, lat` with 6 decimals.
pub fn format_coordinate(vertex: Vertex) -> String {
    format!("{:.6}, {:.6}", vertex.lng, vertex.lat)
}

/// Arithmetic mean of the ring's vertices.
///
/// Not an area-weighted centroid. `None` for an empty ring.
pub fn ring_centroid(ring: &[Vertex]) -> Option<Vertex> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (lat, lng) = ring
        .iter()
        .fold((0.0, 0.0), |(lat, lng), v| (lat + v.lat, lng + v.lng));
    Some(Vertex::new(lat / n, lng / n))
}

/// Measurement text for a drawn geometry.
///
/// Points show their coordinate, paths their length, polygons their area.
pub fn measure(geometry: &FeatureGeometry) -> String {
    match geometry {
        FeatureGeometry::Point(v) => format_coordinate(*v),
        FeatureGeometry::LineString(path) => format_length(polyline_length(path.vertices())),
        FeatureGeometry::Polygon(ring) => format_area(polygon_area(ring.vertices())),
    }
}

fn project_local(vertex: Vertex) -> (f64, f64) {
    let x = vertex.lng * METERS_PER_DEGREE * vertex.lat.to_radians().cos();
    let y = vertex.lat * METERS_PER_DEGREE;
    (x, y)
}
