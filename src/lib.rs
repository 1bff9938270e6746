//! # FieldMap
//!
//! A map-centric facility console core with two subsystems:
//! - interactive geometry capture (points, lines, polygons) with live
//!   measurement and GeoJSON export
//! - viewport-driven loading and screen-space clustering of backend objects
//!
//! ## Architecture
//!
//! FieldMap is organized as a workspace with multiple crates:
//!
//! 1. **fieldmap-core** - Data model, geometry math, errors, event bus
//! 2. **fieldmap-designer** - Drawing tools, feature store, export
//! 3. **fieldmap-clustering** - Map viewport, anchors, clustering engine
//! 4. **fieldmap-communication** - Backend queries, fetch controller
//! 5. **fieldmap-settings** - Configuration files
//! 6. **fieldmap** - Console wiring and the command-line binary
//!
//! Components never reach each other through globals: [`MapConsole`]
//! creates the event bus and hands it, with the other collaborators, to
//! each component it owns.

pub mod cli;
pub mod commands;
pub mod console;
pub mod replay;

pub use fieldmap_core::{
    AppEvent, ClusterGroup, ClusterSet, DrawnFeature, Error, EventBus, FeatureGeometry,
    FeatureKind, Legend, MapObject, ObjectGeometry, Result, Vertex,
};

pub use fieldmap_clustering::{ClusterEngine, ClusterParams, MapViewport, ObjectLayer, Projection};
pub use fieldmap_communication::{
    FetchController, FetchOutcome, HttpObjectQuery, ObjectQuery, ObjectQueryRequest,
};
pub use fieldmap_designer::{
    CanvasInput, DrawingCanvas, DrawingKey, DrawingMode, ExportOutcome, FeatureStore,
    NullPresenter, OverlayPresenter,
};
pub use fieldmap_settings::Config;

pub use console::MapConsole;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout free for command results
/// - RUST_LOG environment variable support
/// - `level` as the floor when RUST_LOG is unset
pub fn init_logging(level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
