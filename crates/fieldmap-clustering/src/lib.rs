//! # FieldMap Clustering
//!
//! Screen-space grouping of backend map objects. The map viewport provides
//! the Web-Mercator projection at the current integer zoom, each object is
//! reduced to a marker anchor, and the engine greedily groups anchors that
//! project closer than a zoom-dependent pixel threshold.

pub mod anchor;
pub mod engine;
pub mod layer;
pub mod viewport;

pub use anchor::anchor;
pub use engine::{ClusterEngine, ClusterParams};
pub use layer::ObjectLayer;
pub use viewport::{MapViewport, Projection, MAX_LATITUDE, TILE_SIZE};
