//! Event type definitions for the event bus.
//!
//! This module defines all application events organized by category.
//! Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::data::{ClusterSet, DrawnFeature, FeatureId, GeoBounds, Vertex};

/// Root event enum for all application events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Drawing tools and the feature store
    Drawing(DrawingEvent),
    /// Backend object set and clustering
    Objects(ObjectEvent),
    /// Map viewport movement
    Viewport(ViewportEvent),
    /// Error and diagnostic events
    Error(ErrorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Drawing(_) => EventCategory::Drawing,
            AppEvent::Objects(_) => EventCategory::Objects,
            AppEvent::Viewport(_) => EventCategory::Viewport,
            AppEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Drawing(e) => e.description(),
            AppEvent::Objects(e) => e.description(),
            AppEvent::Viewport(e) => e.description(),
            AppEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Drawing and feature store events.
    Drawing,
    /// Object set and cluster events.
    Objects,
    /// Viewport events.
    Viewport,
    /// Error and diagnostic events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Drawing => write!(f, "Drawing"),
            EventCategory::Objects => write!(f, "Objects"),
            EventCategory::Viewport => write!(f, "Viewport"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Drawing and feature store events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DrawingEvent {
    /// Active tool changed.
    ModeChanged {
        /// New mode name.
        mode: String,
    },
    /// A feature was finalized and stored.
    FeatureAdded {
        /// The stored feature.
        feature: DrawnFeature,
    },
    /// The most recent feature was deleted.
    FeatureRemoved {
        /// Id of the removed feature.
        id: FeatureId,
    },
    /// Every feature was deleted.
    FeaturesCleared {
        /// Number of features removed.
        count: usize,
    },
    /// The store contents were replaced in bulk.
    FeaturesReplaced {
        /// The new contents in order.
        features: Vec<DrawnFeature>,
    },
}

impl DrawingEvent {
    fn description(&self) -> String {
        match self {
            DrawingEvent::ModeChanged { mode } => format!("Drawing mode: {}", mode),
            DrawingEvent::FeatureAdded { feature } => {
                format!(
                    "Feature {} added ({}, {})",
                    feature.id,
                    feature.kind(),
                    feature.properties.measurement
                )
            }
            DrawingEvent::FeatureRemoved { id } => format!("Feature {} removed", id),
            DrawingEvent::FeaturesCleared { count } => format!("{} features cleared", count),
            DrawingEvent::FeaturesReplaced { features } => {
                format!("Features replaced ({} total)", features.len())
            }
        }
    }
}

/// Object set and clustering events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObjectEvent {
    /// A fetch result replaced the object set.
    ObjectSetUpdated {
        /// Sequence number of the applied request.
        sequence: u64,
        /// Number of objects now held.
        count: usize,
    },
    /// Clusters were recomputed.
    ClustersUpdated {
        /// The new partition.
        clusters: ClusterSet,
    },
    /// A response arrived after a newer request was issued and was dropped.
    FetchSuperseded {
        /// Sequence number of the dropped response.
        sequence: u64,
        /// Latest issued sequence number.
        latest: u64,
    },
}

impl ObjectEvent {
    fn description(&self) -> String {
        match self {
            ObjectEvent::ObjectSetUpdated { sequence, count } => {
                format!("Object set #{} applied ({} objects)", sequence, count)
            }
            ObjectEvent::ClustersUpdated { clusters } => format!(
                "Clusters at zoom {}: {} groups, {} singles",
                clusters.zoom,
                clusters.clusters.len(),
                clusters.singles.len()
            ),
            ObjectEvent::FetchSuperseded { sequence, latest } => {
                format!("Fetch #{} superseded by #{}", sequence, latest)
            }
        }
    }
}

/// Viewport events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// Pan or zoom completed.
    Changed {
        /// Visible bounds.
        bounds: GeoBounds,
        /// Integer zoom level.
        zoom: u8,
    },
    /// A cluster marker was expanded by zooming in on it.
    ClusterExpanded {
        /// Cluster centroid.
        center: Vertex,
        /// Zoom after expansion.
        zoom: u8,
    },
}

impl ViewportEvent {
    fn description(&self) -> String {
        match self {
            ViewportEvent::Changed { bounds, zoom } => {
                format!("Viewport {} at zoom {}", bounds.to_query_value(), zoom)
            }
            ViewportEvent::ClusterExpanded { center, zoom } => {
                format!("Cluster at {} expanded to zoom {}", center, zoom)
            }
        }
    }
}

/// Error and diagnostic events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// Object query failed; previous objects stay visible.
    FetchFailed {
        /// Sequence number of the failed request.
        sequence: u64,
        /// Error message.
        message: String,
    },
    /// Writing the export failed.
    ExportFailed {
        /// Error message.
        message: String,
    },
}

impl ErrorEvent {
    fn description(&self) -> String {
        match self {
            ErrorEvent::FetchFailed { sequence, message } => {
                format!("Fetch #{} failed: {}", sequence, message)
            }
            ErrorEvent::ExportFailed { message } => format!("Export failed: {}", message),
        }
    }
}
