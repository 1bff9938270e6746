//! Decoding of the backend's object `FeatureCollection`.
//!
//! Decoding is lenient per feature: a feature without an id or type is
//! dropped, and geometry with unexpected coordinate shapes is kept as an
//! empty or [`ObjectGeometry::Unsupported`] shape so clustering can skip
//! it. Only a response that is not a collection at all fails the fetch.

use fieldmap_core::{MapObject, ObjectGeometry, QueryError, Vertex};
use serde_json::Value;

/// Decodes a backend response body.
pub fn decode_feature_collection(body: &Value) -> Result<Vec<MapObject>, QueryError> {
    if body.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(QueryError::Decode {
            reason: "response is not a FeatureCollection".to_string(),
        });
    }
    let features = body
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::Decode {
            reason: "FeatureCollection has no features array".to_string(),
        })?;

    let objects: Vec<MapObject> = features.iter().filter_map(decode_feature).collect();
    if objects.len() < features.len() {
        tracing::warn!(
            "Dropped {} of {} features without id or type",
            features.len() - objects.len(),
            features.len()
        );
    }
    Ok(objects)
}

fn decode_feature(feature: &Value) -> Option<MapObject> {
    let properties = feature.get("properties").unwrap_or(&Value::Null);

    let id = properties
        .get("id")
        .or_else(|| feature.get("id"))
        .and_then(as_id)?;
    let object_type = properties
        .get("type")
        .or_else(|| properties.get("object_type"))
        .and_then(Value::as_str)?
        .to_string();
    let display_name = properties
        .get("name")
        .or_else(|| properties.get("display_name"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{object_type} {id}"));

    Some(MapObject {
        id,
        display_name,
        geometry: decode_geometry(feature.get("geometry").unwrap_or(&Value::Null)),
        center: properties.get("center").and_then(decode_center),
        object_type,
    })
}

fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Decodes a geometry object. Never fails.
pub fn decode_geometry(geometry: &Value) -> ObjectGeometry {
    let kind = geometry.get("type").and_then(Value::as_str).unwrap_or("");
    let coordinates = geometry.get("coordinates").unwrap_or(&Value::Null);

    match kind {
        "Point" => match position(coordinates) {
            Some(v) => ObjectGeometry::Point(v),
            None => ObjectGeometry::Unsupported("Point without coordinates".to_string()),
        },
        "LineString" => ObjectGeometry::LineString(positions(coordinates).unwrap_or_default()),
        "Polygon" => {
            let rings = coordinates
                .as_array()
                .and_then(|rings| rings.iter().map(positions).collect::<Option<Vec<_>>>())
                .unwrap_or_default();
            ObjectGeometry::Polygon(rings)
        }
        "" => ObjectGeometry::Unsupported("missing geometry".to_string()),
        other => ObjectGeometry::Unsupported(other.to_string()),
    }
}

/// Backend centers come as `[lon, lat]` or `{"lat": .., "lng": ..}`.
fn decode_center(value: &Value) -> Option<Vertex> {
    if let Some(v) = position(value) {
        return Some(v);
    }
    let lat = value.get("lat").and_then(Value::as_f64)?;
    let lng = value
        .get("lng")
        .or_else(|| value.get("lon"))
        .and_then(Value::as_f64)?;
    Some(Vertex::new(lat, lng))
}

fn position(value: &Value) -> Option<Vertex> {
    let pair = value.as_array()?;
    let lon = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    Some(Vertex::from_lon_lat([lon, lat]))
}

fn positions(value: &Value) -> Option<Vec<Vertex>> {
    value.as_array()?.iter().map(position).collect()
}
