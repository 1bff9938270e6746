//! Drawing canvas: the tool state machine over the feature store.
//!
//! The canvas is idle while the mode is [`DrawingMode::None`] and collecting
//! otherwise. Inputs arrive as [`CanvasInput`] values and each one is
//! processed to completion before the next, so the vertex buffer, the store,
//! and the preview are never touched concurrently.

mod types;

pub use types::{CanvasInput, DrawingKey, DrawingMode, DrawingPreview, InputOutcome, ToolStyle};

use std::fmt;
use std::path::Path as FsPath;
use std::sync::Arc;

use fieldmap_core::{
    geodesy, AppEvent, DrawingEvent, DrawnFeature, ErrorEvent, EventBus, ExportError,
    FeatureError, FeatureGeometry, FeatureId, FeatureProperties, Path, Ring, Vertex,
};
use serde_json::Value;

use crate::export::{self, ExportOutcome};
use crate::feature_store::FeatureStore;
use crate::presenter::OverlayPresenter;

/// Time-derived feature ids, unique within one store.
#[derive(Debug, Default)]
struct FeatureIdGenerator {
    sequence: u64,
}

impl FeatureIdGenerator {
    fn next(&mut self, store: &FeatureStore) -> FeatureId {
        loop {
            self.sequence += 1;
            let id = FeatureId::new(format!(
                "feat-{}-{}",
                chrono::Utc::now().timestamp_millis(),
                self.sequence
            ));
            if !store.contains(&id) {
                return id;
            }
        }
    }
}

/// Drawing tool state machine.
pub struct DrawingCanvas {
    mode: DrawingMode,
    vertices: Vec<Vertex>,
    cursor: Option<Vertex>,
    style: ToolStyle,
    store: FeatureStore,
    presenter: Box<dyn OverlayPresenter>,
    bus: Option<Arc<EventBus>>,
    ids: FeatureIdGenerator,
}

impl DrawingCanvas {
    /// Creates an idle canvas drawing through the given presenter.
    pub fn new(presenter: Box<dyn OverlayPresenter>) -> Self {
        Self {
            mode: DrawingMode::None,
            vertices: Vec::new(),
            cursor: None,
            style: ToolStyle::default(),
            store: FeatureStore::new(),
            presenter,
            bus: None,
            ids: FeatureIdGenerator::default(),
        }
    }

    /// Publishes drawing and export events on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    /// Buffered, unfinalized vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn cursor(&self) -> Option<Vertex> {
        self.cursor
    }

    pub fn style(&self) -> &ToolStyle {
        &self.style
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    /// Sets the color applied to features finalized from now on.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.style.color = color.into();
        if !self.vertices.is_empty() {
            self.refresh_preview();
        }
    }

    /// Sets the category label applied to features finalized from now on.
    pub fn set_category(&mut self, category: Option<String>) {
        self.style.category = category;
    }

    /// Switches tool. The buffer is always discarded, even when the mode
    /// does not change.
    pub fn set_mode(&mut self, mode: DrawingMode) {
        if !self.vertices.is_empty() {
            tracing::debug!(
                "Discarding {} buffered vertices on switch to {}",
                self.vertices.len(),
                mode
            );
        }
        self.reset_buffer();
        self.mode = mode;
        self.presenter
            .set_double_click_zoom(!mode.collects_vertices());
        tracing::debug!("Drawing mode set to {}", mode);
        self.publish(AppEvent::Drawing(DrawingEvent::ModeChanged {
            mode: mode.to_string(),
        }));
    }

    /// Returns to idle without finalizing.
    pub fn deactivate(&mut self) {
        self.set_mode(DrawingMode::None);
    }

    /// Feeds one pointer or keyboard input through the state machine.
    pub fn handle(&mut self, input: CanvasInput) -> InputOutcome {
        match input {
            CanvasInput::Click(vertex) => self.click(vertex),
            CanvasInput::DoubleClick(_) => self.double_click(),
            CanvasInput::RightClick | CanvasInput::KeyPressed(DrawingKey::Escape) => self.cancel(),
            CanvasInput::KeyPressed(DrawingKey::Enter) => self.enter(),
            CanvasInput::CursorMoved(vertex) => self.cursor_moved(vertex),
        }
    }

    fn click(&mut self, vertex: Vertex) -> InputOutcome {
        match self.mode {
            DrawingMode::None => InputOutcome::Ignored,
            DrawingMode::Point => {
                let feature_id = self.finalize_geometry(FeatureGeometry::Point(vertex));
                feature_id.map_or(InputOutcome::Ignored, InputOutcome::Finalized)
            }
            DrawingMode::LineString | DrawingMode::Polygon | DrawingMode::Rectangle => {
                self.vertices.push(vertex);
                self.refresh_preview();
                InputOutcome::VertexAdded(self.vertices.len())
            }
        }
    }

    fn double_click(&mut self) -> InputOutcome {
        if !self.mode.collects_vertices() {
            return InputOutcome::Ignored;
        }
        self.finalize()
    }

    fn enter(&mut self) -> InputOutcome {
        if !self.mode.collects_vertices() || self.vertices.len() < 2 {
            return InputOutcome::Ignored;
        }
        self.finalize()
    }

    fn cancel(&mut self) -> InputOutcome {
        if self.vertices.is_empty() {
            return InputOutcome::Ignored;
        }
        tracing::debug!("Cancelled {} with {} vertices", self.mode, self.vertices.len());
        self.reset_buffer();
        InputOutcome::Cancelled
    }

    fn cursor_moved(&mut self, vertex: Vertex) -> InputOutcome {
        if !self.mode.collects_vertices() {
            return InputOutcome::Ignored;
        }
        self.cursor = Some(vertex);
        if self.vertices.is_empty() {
            return InputOutcome::Ignored;
        }
        self.refresh_preview();
        InputOutcome::PreviewUpdated
    }

    /// Finalizes the buffer into a feature.
    ///
    /// Below the mode's minimum vertex count this does nothing and the
    /// buffer is kept.
    pub fn finalize(&mut self) -> InputOutcome {
        let geometry = match self.mode {
            DrawingMode::LineString => {
                Path::new(self.vertices.clone()).map(FeatureGeometry::LineString)
            }
            DrawingMode::Polygon | DrawingMode::Rectangle => {
                Ring::from_corners(self.vertices.clone()).map(FeatureGeometry::Polygon)
            }
            DrawingMode::Point => self.vertices.first().copied().map(FeatureGeometry::Point),
            DrawingMode::None => None,
        };
        let Some(geometry) = geometry else {
            tracing::debug!(
                "Finalize ignored: {} has {} of {} vertices",
                self.mode,
                self.vertices.len(),
                self.mode.min_vertices()
            );
            return InputOutcome::Ignored;
        };
        self.finalize_geometry(geometry)
            .map_or(InputOutcome::Ignored, InputOutcome::Finalized)
    }

    fn finalize_geometry(&mut self, geometry: FeatureGeometry) -> Option<FeatureId> {
        let mut feature = DrawnFeature {
            id: self.ids.next(&self.store),
            properties: FeatureProperties {
                measurement: geodesy::measure(&geometry),
                category: self.style.category.clone(),
                color: self.style.color.clone(),
            },
            geometry,
            render_handle: None,
        };
        feature.render_handle = Some(self.presenter.show_feature(&feature));

        if let Err(e) = self.store.append(feature.clone()) {
            // Generated ids skip stored ones, so this only trips on a broken store.
            tracing::warn!("Dropping finalized feature: {}", e);
            if let Some(handle) = feature.render_handle {
                self.presenter.remove_feature(handle);
            }
            return None;
        }

        self.reset_buffer();
        tracing::debug!(
            "Finalized {} {} ({})",
            feature.kind(),
            feature.id,
            feature.properties.measurement
        );
        let id = feature.id.clone();
        self.publish(AppEvent::Drawing(DrawingEvent::FeatureAdded { feature }));
        Some(id)
    }

    /// Removes the most recently finalized feature.
    pub fn delete_last(&mut self) -> Option<DrawnFeature> {
        let feature = self.store.delete_last()?;
        if let Some(handle) = feature.render_handle {
            self.presenter.remove_feature(handle);
        }
        self.publish(AppEvent::Drawing(DrawingEvent::FeatureRemoved {
            id: feature.id.clone(),
        }));
        Some(feature)
    }

    /// Removes every feature. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.store.clear_all();
        self.remove_overlays(&removed);
        if !removed.is_empty() {
            self.publish(AppEvent::Drawing(DrawingEvent::FeaturesCleared {
                count: removed.len(),
            }));
        }
        removed.len()
    }

    /// Replaces the store contents in bulk and redraws them.
    pub fn replace_features(&mut self, features: Vec<DrawnFeature>) -> Result<usize, FeatureError> {
        let mut features = features;
        let previous = self.store.replace_all(features.clone())?;
        self.remove_overlays(&previous);

        for feature in &mut features {
            feature.render_handle = Some(self.presenter.show_feature(feature));
        }
        let count = features.len();
        // Store copy needs the fresh handles for later removal.
        self.store.replace_all(features.clone())?;

        tracing::info!("Replaced {} features with {}", previous.len(), count);
        self.publish(AppEvent::Drawing(DrawingEvent::FeaturesReplaced { features }));
        Ok(count)
    }

    /// Loads a previously exported feature collection.
    pub fn import_feature_collection(&mut self, collection: &Value) -> Result<usize, FeatureError> {
        let features = export::parse_feature_collection(collection)?;
        self.replace_features(features)
    }

    /// Builds the export collection, or signals there is nothing to export.
    pub fn export(&self) -> ExportOutcome {
        export::export_store(&self.store)
    }

    /// Writes the export collection to `path`.
    pub fn export_to_file(&self, path: impl AsRef<FsPath>) -> Result<ExportOutcome, ExportError> {
        let path = path.as_ref();
        match export::write_feature_collection(&self.store, path) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::warn!("Export to {} failed: {}", path.display(), e);
                self.publish(AppEvent::Error(ErrorEvent::ExportFailed {
                    message: e.to_string(),
                }));
                Err(e)
            }
        }
    }

    /// Current preview, if a tool has buffered vertices.
    pub fn preview(&self) -> Option<DrawingPreview> {
        if self.vertices.is_empty() {
            return None;
        }
        Some(DrawingPreview {
            mode: self.mode,
            vertices: self.vertices.clone(),
            cursor: self.cursor,
            color: self.style.color.clone(),
        })
    }

    fn refresh_preview(&mut self) {
        match self.preview() {
            Some(preview) => self.presenter.show_preview(&preview),
            None => self.presenter.clear_preview(),
        }
    }

    fn reset_buffer(&mut self) {
        self.vertices.clear();
        self.cursor = None;
        self.presenter.clear_preview();
    }

    fn remove_overlays(&mut self, features: &[DrawnFeature]) {
        for handle in features.iter().filter_map(|f| f.render_handle) {
            self.presenter.remove_feature(handle);
        }
    }

    fn publish(&self, event: AppEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}

impl fmt::Debug for DrawingCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingCanvas")
            .field("mode", &self.mode)
            .field("vertices", &self.vertices.len())
            .field("style", &self.style)
            .field("features", &self.store.len())
            .finish()
    }
}
