//! Shared numeric constants.

/// Meters per degree of latitude used by the equirectangular area projection.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Mean earth radius in meters (haversine distance).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Areas at or above this many square meters are shown in hectares.
pub const HECTARE_THRESHOLD_M2: f64 = 10_000.0;

/// Lengths at or above this many meters are shown in kilometers.
pub const KILOMETER_THRESHOLD_M: f64 = 1_000.0;

/// Default stroke/fill color for drawn features.
pub const DEFAULT_DRAW_COLOR: &str = "#3388ff";

/// Marker color for object types missing from the legend.
pub const FALLBACK_OBJECT_COLOR: &str = "#6b7280";
