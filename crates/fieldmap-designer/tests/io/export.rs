use fieldmap_core::{FeatureGeometry, Vertex};
use fieldmap_designer::{
    CanvasInput, DrawingCanvas, DrawingMode, ExportOutcome, NullPresenter,
};
use tempfile::TempDir;

fn canvas() -> DrawingCanvas {
    DrawingCanvas::new(Box::new(NullPresenter::new()))
}

#[test]
fn test_export_empty_store_is_sentinel() {
    let canvas = canvas();
    assert_eq!(canvas.export(), ExportOutcome::NothingToExport);
}

#[test]
fn test_export_single_point_matches_coordinate() {
    let mut canvas = canvas();
    canvas.set_mode(DrawingMode::Point);
    canvas.handle(CanvasInput::Click(Vertex::new(48.856613, 2.352222)));

    let outcome = canvas.export();
    let collection = outcome.collection().expect("one feature stored");

    assert_eq!(collection["type"], "FeatureCollection");
    let features = collection["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(features[0]["geometry"]["coordinates"][0].as_f64(), Some(2.352222));
    assert_eq!(features[0]["geometry"]["coordinates"][1].as_f64(), Some(48.856613));
    assert!(features[0].get("render_handle").is_none());
    assert!(features[0]["properties"].get("category").is_none());
}

#[test]
fn test_export_to_file_and_reimport() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drawings.geojson");

    let mut source = canvas();
    source.set_category(Some("Banc".to_string()));
    source.set_mode(DrawingMode::LineString);
    source.handle(CanvasInput::Click(Vertex::new(48.0, 2.0)));
    source.handle(CanvasInput::Click(Vertex::new(48.0, 2.001)));
    source.handle(CanvasInput::DoubleClick(Vertex::new(48.0, 2.001)));
    source.set_mode(DrawingMode::Point);
    source.handle(CanvasInput::Click(Vertex::new(48.5, 2.5)));

    let outcome = source.export_to_file(&path).unwrap();
    assert!(!outcome.is_empty());

    let content = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();

    let mut target = canvas();
    assert_eq!(target.import_feature_collection(&value).unwrap(), 2);
    assert_eq!(target.store().list(), source.store().list());
    assert!(target.store().iter().all(|f| f.render_handle.is_some()));
    assert_eq!(
        target.store().last().map(|f| f.geometry.clone()),
        Some(FeatureGeometry::Point(Vertex::new(48.5, 2.5)))
    );
}

#[test]
fn test_export_to_file_skips_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.geojson");

    let outcome = canvas().export_to_file(&path).unwrap();

    assert!(outcome.is_empty());
    assert!(!path.exists());
}

#[test]
fn test_export_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("out.geojson");

    let mut canvas = canvas();
    canvas.set_mode(DrawingMode::Point);
    canvas.handle(CanvasInput::Click(Vertex::new(48.0, 2.0)));

    assert!(canvas.export_to_file(&path).is_err());
}
