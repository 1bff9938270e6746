//! # FieldMap Designer
//!
//! Interactive geometry capture for the map console. Users pick a tool,
//! click vertices on the map, and finalize them into measured features.
//!
//! ## Components
//!
//! - **Canvas**: the drawing tool state machine ([`DrawingCanvas`])
//! - **Feature store**: ordered, id-indexed storage of finalized features
//! - **Presenter**: the seam the map host implements to render overlays
//! - **Export**: GeoJSON `FeatureCollection` export and re-import
//!
//! ## Architecture
//!
//! ```text
//! DrawingCanvas (tool state machine)
//!   ├── FeatureStore (owns feature identity)
//!   ├── OverlayPresenter (renders features and preview)
//!   └── EventBus (optional, injected)
//! ```

pub mod canvas;
pub mod export;
pub mod feature_store;
pub mod presenter;

pub use canvas::{
    CanvasInput, DrawingCanvas, DrawingKey, DrawingMode, DrawingPreview, InputOutcome, ToolStyle,
};
pub use export::{
    default_export_file_name, feature_collection, parse_feature_collection, ExportOutcome,
};
pub use feature_store::FeatureStore;
pub use presenter::{NullPresenter, OverlayPresenter};
