//! FieldMap Settings Crate
//!
//! Handles console configuration: file loading and saving, defaults, and
//! validation.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, Config, ConfigFormat, DrawingSettings, FetchSettings, MapSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
