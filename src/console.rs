//! Map console wiring.
//!
//! [`MapConsole`] owns one instance of every component and connects them
//! explicitly: the event bus, drawing canvas, fetch controller, and the
//! viewport channel the controller follows. A map host drives it by
//! forwarding pointer input to the canvas and completed pan/zoom gestures
//! to [`MapConsole::pan_zoom_completed`].

use std::sync::Arc;

use fieldmap_clustering::{ClusterEngine, MapViewport, ObjectLayer};
use fieldmap_communication::{FetchController, FetchOutcome, HttpObjectQuery, ObjectQuery};
use fieldmap_core::{
    AppEvent, ClusterGroup, ClusterSet, EventBus, MapObject, QueryError, Vertex, ViewportEvent,
};
use fieldmap_designer::{DrawingCanvas, OverlayPresenter};
use fieldmap_settings::Config;
use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// The assembled console.
pub struct MapConsole {
    config: Config,
    bus: Arc<EventBus>,
    canvas: DrawingCanvas,
    fetcher: Arc<FetchController>,
    viewport: watch::Sender<MapViewport>,
}

impl MapConsole {
    /// Assembles a console around an object query and an overlay presenter.
    pub fn new(
        config: Config,
        query: Arc<dyn ObjectQuery>,
        presenter: Box<dyn OverlayPresenter>,
    ) -> Self {
        let bus = Arc::new(EventBus::new());

        let mut canvas = DrawingCanvas::new(presenter).with_event_bus(Arc::clone(&bus));
        canvas.set_color(config.drawing.color.clone());
        canvas.set_category(config.drawing.category.clone());

        let layer = Arc::new(RwLock::new(ObjectLayer::new(
            ClusterEngine::new(config.clustering.clone()),
            config.legend.clone(),
        )));
        let fetcher = FetchController::new(query, layer, Arc::clone(&bus))
            .with_debounce(config.fetch.debounce());
        fetcher.set_category_filter(config.fetch.categories.clone());

        let (viewport, _) = watch::channel(config.map.viewport());

        Self {
            config,
            bus,
            canvas,
            fetcher: Arc::new(fetcher),
            viewport,
        }
    }

    /// Assembles a console that queries the configured HTTP endpoint.
    pub fn with_http(
        config: Config,
        presenter: Box<dyn OverlayPresenter>,
    ) -> Result<Self, QueryError> {
        let query = HttpObjectQuery::new(config.fetch.endpoint.clone(), config.fetch.timeout())?;
        Ok(Self::new(config, Arc::new(query), presenter))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }

    /// Every event published from here on, for an async consumer.
    pub fn events(&self) -> broadcast::Receiver<AppEvent> {
        self.bus.receiver()
    }

    pub fn canvas(&self) -> &DrawingCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut DrawingCanvas {
        &mut self.canvas
    }

    pub fn fetcher(&self) -> Arc<FetchController> {
        Arc::clone(&self.fetcher)
    }

    /// Current viewport.
    pub fn viewport(&self) -> MapViewport {
        self.viewport.borrow().clone()
    }

    /// Objects from the last applied fetch.
    pub fn objects(&self) -> Vec<MapObject> {
        self.fetcher.layer().read().objects().to_vec()
    }

    /// Clusters for the current object set.
    pub fn clusters(&self) -> ClusterSet {
        self.fetcher.layer().read().clusters().clone()
    }

    /// Starts following viewport changes: one fetch now, then one per
    /// settled pan/zoom.
    pub fn start(&self) -> JoinHandle<()> {
        self.fetcher.clone().spawn(self.viewport.subscribe())
    }

    /// Runs one fetch cycle for the current viewport and waits for it.
    pub async fn refresh_now(&self) -> FetchOutcome {
        let viewport = self.viewport();
        self.fetcher.refresh(&viewport).await
    }

    /// Restricts fetched objects to these category labels.
    pub fn set_category_filter(&self, labels: Vec<String>) {
        self.fetcher.set_category_filter(labels);
    }

    /// Reports a completed pan or zoom gesture.
    pub fn pan_zoom_completed(&self, viewport: MapViewport) {
        self.publish_viewport(&viewport);
        self.viewport.send_replace(viewport);
    }

    /// Pans the view by a screen delta.
    pub fn pan_by(&self, dx: f64, dy: f64) {
        let mut viewport = self.viewport();
        viewport.pan_by(dx, dy);
        self.pan_zoom_completed(viewport);
    }

    /// Centers the view on `center` at `zoom`.
    pub fn zoom_to(&self, center: Vertex, zoom: u8) {
        let mut viewport = self.viewport();
        viewport.zoom_to(center, zoom);
        self.pan_zoom_completed(viewport);
    }

    /// Zooms in on a clicked cluster marker.
    ///
    /// Returns false when the view is already at or past the expansion
    /// ceiling; the map is left unchanged then.
    pub fn expand_cluster(&self, group: &ClusterGroup) -> bool {
        let viewport = self.viewport();
        let target = self
            .fetcher
            .layer()
            .read()
            .engine()
            .expansion_target(group, viewport.zoom());
        let Some((center, zoom)) = target else {
            tracing::debug!("Cluster at {} not expanded at zoom {}", group.center, viewport.zoom());
            return false;
        };

        self.zoom_to(center, zoom);
        let zoom = self.viewport.borrow().zoom();
        self.bus
            .publish(AppEvent::Viewport(ViewportEvent::ClusterExpanded { center, zoom }));
        true
    }

    fn publish_viewport(&self, viewport: &MapViewport) {
        self.bus.publish(AppEvent::Viewport(ViewportEvent::Changed {
            bounds: viewport.bounds(),
            zoom: viewport.zoom(),
        }));
    }
}
