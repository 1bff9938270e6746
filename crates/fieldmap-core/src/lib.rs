//! # FieldMap Core
//!
//! Core types, geometry math, and utilities for FieldMap.
//! Provides the shared data model for drawn features and backend map
//! objects, the measurement functions used by the drawing tools, the
//! error taxonomy, and the typed event bus that links the components.

pub mod constants;
pub mod data;
pub mod error;
pub mod event_bus;
pub mod geodesy;

pub use data::{
    ClusterGroup, ClusterSet, DrawnFeature, FeatureGeometry, FeatureId, FeatureKind,
    FeatureProperties, GeoBounds, Legend, LegendEntry, MapObject, ObjectGeometry, ObjectKey,
    Path, RenderHandle, Ring, Vertex,
};

pub use error::{Error, ExportError, FeatureError, QueryError, Result};

pub use event_bus::{
    AppEvent, DrawingEvent, ErrorEvent, EventBus, EventCategory, EventFilter, ObjectEvent,
    SubscriptionId, ViewportEvent, EVENT_CHANNEL_CAPACITY,
};

pub use geodesy::{
    format_area, format_coordinate, format_length, measure, polygon_area, polyline_length,
    ring_centroid,
};
