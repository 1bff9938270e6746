//! # FieldMap Communication
//!
//! Talks to the backend object service. The [`ObjectQuery`] trait is the
//! seam the rest of the console depends on; [`HttpObjectQuery`] implements
//! it over HTTP. The [`FetchController`] follows the map viewport, issues
//! queries, and applies only the freshest response to the object layer.

pub mod controller;
pub mod geojson;
pub mod query;

pub use controller::{FetchController, FetchOutcome, PendingFetch, DEFAULT_DEBOUNCE};
pub use geojson::{decode_feature_collection, decode_geometry};
pub use query::{HttpObjectQuery, ObjectQuery, ObjectQueryRequest};
