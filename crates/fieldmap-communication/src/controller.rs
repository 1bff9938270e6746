//! Viewport-driven fetch controller.
//!
//! Every completed pan or zoom issues a query for the visible bounds. Each
//! query is tagged with a sequence number and only the most recently
//! issued one may replace the object set, so a slow response for an old
//! viewport can never overwrite fresher data. Older requests are not
//! cancelled; their results are dropped on arrival.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fieldmap_clustering::{MapViewport, ObjectLayer};
use fieldmap_core::{AppEvent, ClusterSet, ErrorEvent, EventBus, ObjectEvent, QueryError};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::query::{ObjectQuery, ObjectQueryRequest};

/// Default settle time after the last viewport change.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// How one fetch cycle ended.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The response replaced the object set and clusters were recomputed.
    Applied { sequence: u64, count: usize },
    /// A newer request was issued before this one completed.
    Superseded { sequence: u64, latest: u64 },
    /// The query failed; the previous objects stay in place.
    Failed { sequence: u64, error: QueryError },
}

impl FetchOutcome {
    pub fn sequence(&self) -> u64 {
        match self {
            FetchOutcome::Applied { sequence, .. }
            | FetchOutcome::Superseded { sequence, .. }
            | FetchOutcome::Failed { sequence, .. } => *sequence,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied { .. })
    }
}

/// A fetch that holds its sequence number but has not been sent yet.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub sequence: u64,
    pub request: ObjectQueryRequest,
    pub viewport: MapViewport,
}

/// Keeps the object layer in sync with the viewport.
pub struct FetchController {
    query: Arc<dyn ObjectQuery>,
    layer: Arc<RwLock<ObjectLayer>>,
    bus: Arc<EventBus>,
    category_filter: RwLock<Vec<String>>,
    issued: AtomicU64,
    debounce: Duration,
}

impl FetchController {
    pub fn new(
        query: Arc<dyn ObjectQuery>,
        layer: Arc<RwLock<ObjectLayer>>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            query,
            layer,
            bus,
            category_filter: RwLock::new(Vec::new()),
            issued: AtomicU64::new(0),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Sets how long the viewport must stay still before a fetch is issued.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn layer(&self) -> Arc<RwLock<ObjectLayer>> {
        Arc::clone(&self.layer)
    }

    /// Restricts queries to these category labels. Empty means no filter.
    pub fn set_category_filter(&self, labels: Vec<String>) {
        tracing::debug!("Category filter set to {:?}", labels);
        *self.category_filter.write() = labels;
    }

    pub fn category_filter(&self) -> Vec<String> {
        self.category_filter.read().clone()
    }

    /// Sequence number of the most recently issued request, 0 before the first.
    pub fn latest_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Query parameters for `viewport` under the current category filter.
    pub fn build_request(&self, viewport: &MapViewport) -> ObjectQueryRequest {
        let layer = self.layer.read();
        let types = self
            .category_filter
            .read()
            .iter()
            .map(|label| layer.legend().backend_key(label))
            .collect();
        ObjectQueryRequest {
            bounds: viewport.bounds(),
            zoom: viewport.zoom(),
            types,
        }
    }

    /// Reserves the next sequence number and captures the request for
    /// `viewport`. Issue order, not completion or scheduling order, decides
    /// which response may be applied.
    pub fn issue(&self, viewport: &MapViewport) -> PendingFetch {
        let request = self.build_request(viewport);
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            "Fetch #{} for {} at zoom {}",
            sequence,
            request.bounds.to_query_value(),
            request.zoom
        );
        PendingFetch {
            sequence,
            request,
            viewport: viewport.clone(),
        }
    }

    /// Runs one fetch cycle for `viewport`. The sequence number is taken
    /// when this is called, before the returned future is first polled.
    pub fn refresh(&self, viewport: &MapViewport) -> impl Future<Output = FetchOutcome> + '_ {
        let pending = self.issue(viewport);
        self.complete(pending)
    }

    /// Queries the backend for an issued fetch and applies the response if
    /// nothing newer has been issued since.
    pub async fn complete(&self, pending: PendingFetch) -> FetchOutcome {
        let PendingFetch {
            sequence,
            request,
            viewport,
        } = pending;

        let result = self.query.query_objects(&request).await;

        // Checked under the write lock so a newer response applied in the
        // meantime is never overwritten.
        let applied = {
            let mut layer = self.layer.write();
            let latest = self.latest_issued();
            if sequence != latest {
                Err(latest)
            } else {
                Ok(match result {
                    Ok(objects) => {
                        let count = objects.len();
                        layer.replace_objects(objects, sequence);
                        Ok((count, layer.recluster(&viewport).clone()))
                    }
                    Err(error) => Err(error),
                })
            }
        };

        match applied {
            Err(latest) => {
                tracing::debug!("Dropping fetch #{}: #{} is newer", sequence, latest);
                self.publish(AppEvent::Objects(ObjectEvent::FetchSuperseded { sequence, latest }));
                FetchOutcome::Superseded { sequence, latest }
            }
            Ok(Ok((count, clusters))) => {
                tracing::info!(
                    "Fetch #{} applied: {} objects, {} clusters",
                    sequence,
                    count,
                    clusters.clusters.len()
                );
                self.publish(AppEvent::Objects(ObjectEvent::ObjectSetUpdated { sequence, count }));
                self.publish(AppEvent::Objects(ObjectEvent::ClustersUpdated { clusters }));
                FetchOutcome::Applied { sequence, count }
            }
            Ok(Err(error)) => {
                tracing::warn!("Fetch #{} failed, keeping previous objects: {}", sequence, error);
                self.publish(AppEvent::Error(ErrorEvent::FetchFailed {
                    sequence,
                    message: error.to_string(),
                }));
                FetchOutcome::Failed { sequence, error }
            }
        }
    }

    /// Reclusters the held objects for `viewport` without fetching.
    pub fn recluster(&self, viewport: &MapViewport) -> ClusterSet {
        let clusters = self.layer.write().recluster(viewport).clone();
        self.publish(AppEvent::Objects(ObjectEvent::ClustersUpdated {
            clusters: clusters.clone(),
        }));
        clusters
    }

    /// Follows `viewports` until the sender is dropped.
    ///
    /// Fetches once for the initial viewport, then after every change that
    /// is followed by the debounce interval without further changes. Held
    /// objects are reclustered as soon as the zoom changes. Fetches run as
    /// separate tasks so a slow response never delays the next one.
    pub async fn run(self: Arc<Self>, mut viewports: watch::Receiver<MapViewport>) {
        let initial = viewports.borrow_and_update().clone();
        let mut zoom = initial.zoom();
        self.refresh(&initial).await;

        while viewports.changed().await.is_ok() {
            let current = viewports.borrow_and_update().clone();
            if current.zoom() != zoom {
                zoom = current.zoom();
                self.recluster(&current);
            }

            if !self.debounce.is_zero() {
                loop {
                    tokio::select! {
                        changed = viewports.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            let current = viewports.borrow_and_update().clone();
                            if current.zoom() != zoom {
                                zoom = current.zoom();
                                self.recluster(&current);
                            }
                        }
                        _ = tokio::time::sleep(self.debounce) => break,
                    }
                }
            }

            let pending = self.issue(&viewports.borrow_and_update());
            let controller = Arc::clone(&self);
            tokio::spawn(async move {
                controller.complete(pending).await;
            });
        }
        tracing::debug!("Viewport channel closed, fetch loop stopped");
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn spawn(self: Arc<Self>, viewports: watch::Receiver<MapViewport>) -> JoinHandle<()> {
        tokio::spawn(self.run(viewports))
    }

    fn publish(&self, event: AppEvent) {
        self.bus.publish(event);
    }
}
