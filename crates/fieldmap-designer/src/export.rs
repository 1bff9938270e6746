//! GeoJSON export and import of drawn features.

use std::fs;
use std::path::Path as FsPath;

use fieldmap_core::constants::DEFAULT_DRAW_COLOR;
use fieldmap_core::{
    geodesy, DrawnFeature, ExportError, FeatureError, FeatureGeometry, FeatureId,
    FeatureProperties, Path, Ring, Vertex,
};
use serde_json::{json, Value};

use crate::feature_store::FeatureStore;

/// Result of an export request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// The store was empty; nothing was produced.
    NothingToExport,
    /// A `FeatureCollection` holding every stored feature.
    Collection(Value),
}

impl ExportOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, ExportOutcome::NothingToExport)
    }

    /// The collection, if one was produced.
    pub fn collection(&self) -> Option<&Value> {
        match self {
            ExportOutcome::Collection(value) => Some(value),
            ExportOutcome::NothingToExport => None,
        }
    }
}

/// Builds a `FeatureCollection` in insertion order. Render handles are
/// never included.
pub fn feature_collection(store: &FeatureStore) -> Value {
    let features: Vec<Value> = store.iter().map(DrawnFeature::to_geojson).collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Exports the store, or returns the nothing-to-export sentinel.
pub fn export_store(store: &FeatureStore) -> ExportOutcome {
    if store.is_empty() {
        tracing::info!("Nothing to export");
        return ExportOutcome::NothingToExport;
    }
    ExportOutcome::Collection(feature_collection(store))
}

/// Writes the export as pretty-printed JSON. An empty store writes no file.
pub fn write_feature_collection(
    store: &FeatureStore,
    path: &FsPath,
) -> Result<ExportOutcome, ExportError> {
    let outcome = export_store(store);
    if let ExportOutcome::Collection(collection) = &outcome {
        let content = serde_json::to_string_pretty(collection)?;
        fs::write(path, content)?;
        tracing::info!("Exported {} features to {}", store.len(), path.display());
    }
    Ok(outcome)
}

/// Download name for an export, e.g. `drawings-20240131-142500.geojson`.
pub fn default_export_file_name() -> String {
    format!(
        "drawings-{}.geojson",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

/// Parses a `FeatureCollection` produced by [`feature_collection`].
///
/// Missing measurements are recomputed and a missing color falls back to
/// the default drawing color. Any unusable feature rejects the whole
/// collection.
pub fn parse_feature_collection(value: &Value) -> Result<Vec<DrawnFeature>, FeatureError> {
    if value.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(malformed("not a FeatureCollection"));
    }
    let features = value
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing features array"))?;

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            parse_feature(feature).map_err(|reason| malformed(format!("feature {index}: {reason}")))
        })
        .collect()
}

fn parse_feature(feature: &Value) -> Result<DrawnFeature, String> {
    let id = match feature.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err("missing id".to_string()),
    };

    let geometry = feature.get("geometry").ok_or("missing geometry")?;
    let geometry = parse_geometry(geometry)?;

    let properties = feature.get("properties");
    let text = |key: &str| {
        properties
            .and_then(|p| p.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Ok(DrawnFeature {
        id: FeatureId::new(id),
        properties: FeatureProperties {
            measurement: text("measurement").unwrap_or_else(|| geodesy::measure(&geometry)),
            category: text("category"),
            color: text("color").unwrap_or_else(|| DEFAULT_DRAW_COLOR.to_string()),
        },
        geometry,
        render_handle: None,
    })
}

fn parse_geometry(geometry: &Value) -> Result<FeatureGeometry, String> {
    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or("missing geometry type")?;
    let coordinates = geometry.get("coordinates").ok_or("missing coordinates")?;

    match kind {
        "Point" => parse_position(coordinates).map(FeatureGeometry::Point),
        "LineString" => {
            let vertices = parse_positions(coordinates)?;
            Path::new(vertices)
                .map(FeatureGeometry::LineString)
                .ok_or_else(|| "line needs at least 2 positions".to_string())
        }
        "Polygon" => {
            let exterior = coordinates
                .as_array()
                .and_then(|rings| rings.first())
                .ok_or("polygon has no rings")?;
            let vertices = parse_positions(exterior)?;
            Ring::close(vertices)
                .map(FeatureGeometry::Polygon)
                .ok_or_else(|| "ring needs at least 3 corners".to_string())
        }
        other => Err(format!("unsupported geometry type {other}")),
    }
}

fn parse_position(value: &Value) -> Result<Vertex, String> {
    let pair = value.as_array().ok_or("position is not an array")?;
    match (
        pair.first().and_then(Value::as_f64),
        pair.get(1).and_then(Value::as_f64),
    ) {
        (Some(lon), Some(lat)) => Ok(Vertex::from_lon_lat([lon, lat])),
        _ => Err("position needs numeric lon and lat".to_string()),
    }
}

fn parse_positions(value: &Value) -> Result<Vec<Vertex>, String> {
    value
        .as_array()
        .ok_or("positions are not an array")?
        .iter()
        .map(parse_position)
        .collect()
}

fn malformed(reason: impl Into<String>) -> FeatureError {
    FeatureError::MalformedCollection {
        reason: reason.into(),
    }
}
