pub mod fetch;
pub mod init_config;
pub mod replay;

use std::path::PathBuf;

use anyhow::Result;
use fieldmap_settings::{default_config_path, Config};

use crate::cli::Cli;

/// Path named by `--config`, else the user config file.
pub fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => Ok(default_config_path()?),
    }
}

/// Loads the config the command line points at, falling back to defaults.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let path = config_path(cli)?;
    Ok(Config::load_or_default(&path)?)
}
