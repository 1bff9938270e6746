//! Configuration for the FieldMap console
//!
//! Provides configuration file handling, defaults, and validation.
//! Supports JSON and TOML file formats, chosen by file extension.
//!
//! Configuration is organized into logical sections:
//! - Map settings (initial view, zoom range, screen size)
//! - Fetch settings (backend endpoint, debounce, timeout)
//! - Clustering parameters (distance threshold, expansion)
//! - Drawing defaults (color, category)
//! - Legend (category labels, backend keys, marker colors)

use std::path::{Path, PathBuf};
use std::time::Duration;

use fieldmap_clustering::{ClusterParams, MapViewport};
use fieldmap_core::constants::DEFAULT_DRAW_COLOR;
use fieldmap_core::{Legend, Vertex};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Highest zoom the tiling scheme supports.
const MAX_SUPPORTED_ZOOM: u8 = 22;

/// Initial map view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Initial center latitude
    pub center_lat: f64,
    /// Initial center longitude
    pub center_lng: f64,
    /// Initial zoom
    pub zoom: u8,
    /// Lowest allowed zoom
    pub min_zoom: u8,
    /// Highest allowed zoom
    pub max_zoom: u8,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center_lat: 48.8566,
            center_lng: 2.3522,
            zoom: 16,
            min_zoom: 2,
            max_zoom: 20,
            viewport_width: 1280,
            viewport_height: 800,
        }
    }
}

impl MapSettings {
    /// The initial viewport described by these settings.
    pub fn viewport(&self) -> MapViewport {
        MapViewport::with_zoom_range(
            Vertex::new(self.center_lat, self.center_lng),
            self.zoom,
            f64::from(self.viewport_width),
            f64::from(self.viewport_height),
            self.min_zoom,
            self.max_zoom,
        )
    }
}

/// Backend object query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Object query endpoint URL
    pub endpoint: String,
    /// Quiet time after a pan/zoom before fetching (milliseconds)
    pub debounce_ms: u64,
    /// HTTP request timeout (milliseconds)
    pub timeout_ms: u64,
    /// Category labels to fetch; empty fetches every type
    pub categories: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/api/objects".to_string(),
            debounce_ms: 300,
            timeout_ms: 15_000,
            categories: Vec::new(),
        }
    }
}

impl FetchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Drawing tool defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSettings {
    /// Initial stroke/fill color
    pub color: String,
    /// Initial category label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            color: DEFAULT_DRAW_COLOR.to_string(),
            category: None,
        }
    }
}

/// On-disk file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Complete console configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial map view
    pub map: MapSettings,
    /// Backend object query
    pub fetch: FetchSettings,
    /// Clustering parameters
    pub clustering: ClusterParams,
    /// Drawing defaults
    pub drawing: DrawingSettings,
    /// Category legend
    pub legend: Legend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map: MapSettings::default(),
            fetch: FetchSettings::default(),
            clustering: ClusterParams::default(),
            drawing: DrawingSettings::default(),
            legend: Legend::facility_defaults(),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from file, or the defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let map = &self.map;
        if !(-90.0..=90.0).contains(&map.center_lat) {
            return Err(SettingsError::invalid("map.center_lat", "must be within -90..=90"));
        }
        if !(-180.0..=180.0).contains(&map.center_lng) {
            return Err(SettingsError::invalid("map.center_lng", "must be within -180..=180"));
        }
        if map.min_zoom > map.max_zoom {
            return Err(SettingsError::invalid("map.min_zoom", "must not exceed map.max_zoom"));
        }
        if map.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(SettingsError::invalid(
                "map.max_zoom",
                format!("must be at most {}", MAX_SUPPORTED_ZOOM),
            ));
        }
        if !(map.min_zoom..=map.max_zoom).contains(&map.zoom) {
            return Err(SettingsError::invalid("map.zoom", "must be within the zoom range"));
        }
        if map.viewport_width == 0 || map.viewport_height == 0 {
            return Err(SettingsError::invalid("map.viewport", "dimensions must be > 0"));
        }

        let fetch = &self.fetch;
        if !(fetch.endpoint.starts_with("http://") || fetch.endpoint.starts_with("https://")) {
            return Err(SettingsError::invalid("fetch.endpoint", "must be an http(s) URL"));
        }
        if fetch.timeout_ms == 0 {
            return Err(SettingsError::invalid("fetch.timeout_ms", "must be > 0"));
        }

        let clustering = &self.clustering;
        if clustering.min_distance_px <= 0.0 {
            return Err(SettingsError::invalid("clustering.min_distance_px", "must be > 0"));
        }
        if clustering.base_distance_px < clustering.min_distance_px {
            return Err(SettingsError::invalid(
                "clustering.base_distance_px",
                "must be at least clustering.min_distance_px",
            ));
        }
        if clustering.distance_per_zoom_px < 0.0 {
            return Err(SettingsError::invalid("clustering.distance_per_zoom_px", "must be >= 0"));
        }
        if clustering.expand_zoom_step == 0 {
            return Err(SettingsError::invalid("clustering.expand_zoom_step", "must be > 0"));
        }

        if !is_hex_color(&self.drawing.color) {
            return Err(SettingsError::invalid("drawing.color", "must be a #rrggbb color"));
        }
        for entry in self.legend.entries() {
            if entry.label.is_empty() || entry.object_type.is_empty() {
                return Err(SettingsError::invalid("legend", "labels and keys must be non-empty"));
            }
            if !is_hex_color(&entry.color) {
                return Err(SettingsError::invalid(
                    "legend",
                    format!("color of '{}' must be a #rrggbb color", entry.label),
                ));
            }
        }

        Ok(())
    }

    /// Category labels offered by the drawing tools, in legend order
    pub fn categories(&self) -> Vec<String> {
        self.legend.entries().iter().map(|e| e.label.clone()).collect()
    }
}

/// Default config location: `<config dir>/fieldmap/config.toml`
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()))?;
    Ok(dir.join("fieldmap").join("config.toml"))
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
