use std::sync::{Arc, Mutex};

use fieldmap_core::{
    AppEvent, DrawingEvent, DrawnFeature, EventBus, EventCategory, EventFilter, FeatureGeometry,
    FeatureKind, RenderHandle, Vertex,
};
use fieldmap_designer::{
    CanvasInput, DrawingCanvas, DrawingKey, DrawingMode, DrawingPreview, InputOutcome,
    OverlayPresenter,
};

#[derive(Debug, Default)]
struct Recorded {
    shown: Vec<RenderHandle>,
    removed: Vec<RenderHandle>,
    previews: Vec<DrawingPreview>,
    preview_cleared: usize,
    double_click_zoom: Option<bool>,
}

struct RecordingPresenter {
    log: Arc<Mutex<Recorded>>,
    next: u64,
}

impl OverlayPresenter for RecordingPresenter {
    fn show_feature(&mut self, _feature: &DrawnFeature) -> RenderHandle {
        self.next += 1;
        let handle = RenderHandle(self.next);
        self.log.lock().unwrap().shown.push(handle);
        handle
    }

    fn remove_feature(&mut self, handle: RenderHandle) {
        self.log.lock().unwrap().removed.push(handle);
    }

    fn show_preview(&mut self, preview: &DrawingPreview) {
        self.log.lock().unwrap().previews.push(preview.clone());
    }

    fn clear_preview(&mut self) {
        self.log.lock().unwrap().preview_cleared += 1;
    }

    fn set_double_click_zoom(&mut self, enabled: bool) {
        self.log.lock().unwrap().double_click_zoom = Some(enabled);
    }
}

fn recording_canvas() -> (DrawingCanvas, Arc<Mutex<Recorded>>) {
    let log = Arc::new(Mutex::new(Recorded::default()));
    let presenter = RecordingPresenter {
        log: log.clone(),
        next: 0,
    };
    (DrawingCanvas::new(Box::new(presenter)), log)
}

fn click(canvas: &mut DrawingCanvas, lat: f64, lng: f64) -> InputOutcome {
    canvas.handle(CanvasInput::Click(Vertex::new(lat, lng)))
}

#[test]
fn test_point_click_finalizes_immediately() {
    let (mut canvas, log) = recording_canvas();
    canvas.set_mode(DrawingMode::Point);

    let outcome = click(&mut canvas, 48.8566, 2.3522);

    assert!(matches!(outcome, InputOutcome::Finalized(_)));
    assert_eq!(canvas.store().len(), 1);
    assert!(canvas.vertices().is_empty());
    assert!(canvas.preview().is_none());
    let feature = canvas.store().last().unwrap();
    assert_eq!(feature.kind(), FeatureKind::Point);
    assert_eq!(feature.render_handle, Some(RenderHandle(1)));
    assert!(log.lock().unwrap().previews.is_empty());
}

#[test]
fn test_point_mode_ignores_double_click_and_enter() {
    let (mut canvas, _) = recording_canvas();
    canvas.set_mode(DrawingMode::Point);
    assert_eq!(
        canvas.handle(CanvasInput::DoubleClick(Vertex::new(48.0, 2.0))),
        InputOutcome::Ignored
    );
    assert_eq!(
        canvas.handle(CanvasInput::KeyPressed(DrawingKey::Enter)),
        InputOutcome::Ignored
    );
    assert!(canvas.store().is_empty());
}

#[test]
fn test_linestring_with_one_vertex_does_not_finalize() {
    let (mut canvas, _) = recording_canvas();
    canvas.set_mode(DrawingMode::LineString);
    click(&mut canvas, 48.0, 2.0);

    let outcome = canvas.handle(CanvasInput::DoubleClick(Vertex::new(48.0, 2.0)));

    assert_eq!(outcome, InputOutcome::Ignored);
    assert!(canvas.store().is_empty());
    assert_eq!(canvas.vertices().len(), 1);
}

#[test]
fn test_linestring_double_click_finalizes_length() {
    let (mut canvas, _) = recording_canvas();
    canvas.set_mode(DrawingMode::LineString);
    click(&mut canvas, 0.0, 0.0);
    click(&mut canvas, 0.0, 0.01);

    let outcome = canvas.handle(CanvasInput::DoubleClick(Vertex::new(0.0, 0.01)));

    assert!(matches!(outcome, InputOutcome::Finalized(_)));
    let feature = canvas.store().last().unwrap();
    assert_eq!(feature.kind(), FeatureKind::LineString);
    // 0.01 degrees of longitude at the equator is about 1.11 km.
    assert_eq!(feature.properties.measurement, "1.11 km");
}

#[test]
fn test_polygon_with_three_vertices_closes_ring() {
    let (mut canvas, _) = recording_canvas();
    canvas.set_mode(DrawingMode::Polygon);
    click(&mut canvas, 48.0, 2.0);
    click(&mut canvas, 48.0, 2.001);
    click(&mut canvas, 48.001, 2.001);

    let outcome = canvas.handle(CanvasInput::KeyPressed(DrawingKey::Enter));

    assert!(matches!(outcome, InputOutcome::Finalized(_)));
    let feature = canvas.store().last().unwrap();
    let FeatureGeometry::Polygon(ring) = &feature.geometry else {
        panic!("expected polygon, got {:?}", feature.geometry);
    };
    assert_eq!(ring.vertices().len(), 4);
    assert_eq!(ring.vertices().first(), ring.vertices().last());

    let coordinates = feature.to_geojson()["geometry"]["coordinates"][0].clone();
    let ring_json = coordinates.as_array().unwrap();
    assert_eq!(ring_json.first(), ring_json.last());
    assert!(feature.properties.measurement.ends_with("m²"));
}

#[test]
fn test_polygon_back_on_first_vertex_still_finalizes() {
    let (mut canvas, _) = recording_canvas();
    canvas.set_mode(DrawingMode::Polygon);
    click(&mut canvas, 48.0, 2.0);
    click(&mut canvas, 48.0, 2.001);
    click(&mut canvas, 48.0, 2.0);

    let outcome = canvas.handle(CanvasInput::KeyPressed(DrawingKey::Enter));

    assert!(matches!(outcome, InputOutcome::Finalized(_)));
    assert_eq!(canvas.store().len(), 1);
    let feature = canvas.store().last().unwrap();
    let FeatureGeometry::Polygon(ring) = &feature.geometry else {
        panic!("expected polygon, got {:?}", feature.geometry);
    };
    assert_eq!(ring.vertices().len(), 4);
    assert_eq!(ring.corners().len(), 3);
}

#[test]
fn test_rectangle_finalizes_as_polygon() {
    let (mut canvas, _) = recording_canvas();
    canvas.set_mode(DrawingMode::Rectangle);
    click(&mut canvas, 48.0, 2.0);
    click(&mut canvas, 48.0, 2.01);
    click(&mut canvas, 48.01, 2.01);
    click(&mut canvas, 48.01, 2.0);
    canvas.handle(CanvasInput::DoubleClick(Vertex::new(48.01, 2.0)));

    let feature = canvas.store().last().unwrap();
    assert_eq!(feature.kind(), FeatureKind::Polygon);
    assert!(feature.properties.measurement.ends_with("ha"));
}

#[test]
fn test_cancel_keeps_tool_active() {
    let (mut canvas, _) = recording_canvas();
    canvas.set_mode(DrawingMode::Polygon);
    click(&mut canvas, 48.0, 2.0);
    click(&mut canvas, 48.0, 2.001);

    assert_eq!(canvas.handle(CanvasInput::RightClick), InputOutcome::Cancelled);
    assert!(canvas.vertices().is_empty());
    assert_eq!(canvas.mode(), DrawingMode::Polygon);

    click(&mut canvas, 48.0, 2.0);
    assert_eq!(
        canvas.handle(CanvasInput::KeyPressed(DrawingKey::Escape)),
        InputOutcome::Cancelled
    );
    assert!(canvas.store().is_empty());
}

#[test]
fn test_deactivate_discards_partial_shape() {
    let (mut canvas, log) = recording_canvas();
    canvas.set_mode(DrawingMode::LineString);
    assert_eq!(log.lock().unwrap().double_click_zoom, Some(false));
    click(&mut canvas, 48.0, 2.0);
    click(&mut canvas, 48.0, 2.001);

    canvas.deactivate();

    assert_eq!(canvas.mode(), DrawingMode::None);
    assert!(canvas.vertices().is_empty());
    assert!(canvas.store().is_empty());
    assert_eq!(log.lock().unwrap().double_click_zoom, Some(true));
}

#[test]
fn test_preview_replaced_on_each_mutation() {
    let (mut canvas, log) = recording_canvas();
    canvas.set_mode(DrawingMode::Polygon);
    click(&mut canvas, 48.0, 2.0);
    canvas.handle(CanvasInput::CursorMoved(Vertex::new(48.0, 2.001)));
    click(&mut canvas, 48.0, 2.001);

    let log = log.lock().unwrap();
    assert_eq!(log.previews.len(), 3);
    assert_eq!(log.previews[0].vertices.len(), 1);
    assert_eq!(log.previews[1].cursor, Some(Vertex::new(48.0, 2.001)));
    assert_eq!(log.previews[2].vertices.len(), 2);
}

#[test]
fn test_delete_last_removes_overlay() {
    let (mut canvas, log) = recording_canvas();
    canvas.set_mode(DrawingMode::Point);
    click(&mut canvas, 48.0, 2.0);
    click(&mut canvas, 48.0, 2.001);

    let removed = canvas.delete_last().unwrap();

    assert_eq!(removed.render_handle, Some(RenderHandle(2)));
    assert_eq!(canvas.store().len(), 1);
    assert_eq!(log.lock().unwrap().removed, vec![RenderHandle(2)]);
}

#[test]
fn test_clear_all_removes_every_overlay() {
    let (mut canvas, log) = recording_canvas();
    canvas.set_mode(DrawingMode::Point);
    click(&mut canvas, 48.0, 2.0);
    click(&mut canvas, 48.0, 2.001);

    assert_eq!(canvas.clear_all(), 2);
    assert!(canvas.store().is_empty());
    assert_eq!(log.lock().unwrap().removed.len(), 2);
    assert_eq!(canvas.clear_all(), 0);
}

#[test]
fn test_events_published_on_bus() {
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Drawing]),
        move |event| sink.lock().unwrap().push(event),
    );

    let (canvas, _) = recording_canvas();
    let mut canvas = canvas.with_event_bus(bus);
    canvas.set_mode(DrawingMode::Point);
    click(&mut canvas, 48.0, 2.0);
    canvas.delete_last();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(matches!(
        &seen[0],
        AppEvent::Drawing(DrawingEvent::ModeChanged { mode }) if mode == "Point"
    ));
    assert!(matches!(
        &seen[1],
        AppEvent::Drawing(DrawingEvent::FeatureAdded { feature }) if feature.kind() == FeatureKind::Point
    ));
    assert!(matches!(
        &seen[2],
        AppEvent::Drawing(DrawingEvent::FeatureRemoved { .. })
    ));
}
