//! Per-user directories for lineend.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "lineend";

/// `$XDG_CONFIG_HOME/lineend` or the platform equivalent.
pub fn get_config_dir() -> Result<PathBuf> {
    app_dir(dirs::config_dir(), "config")
}

/// `$XDG_DATA_HOME/lineend` or the platform equivalent. Holds the log file.
pub fn get_data_dir() -> Result<PathBuf> {
    app_dir(dirs::data_dir(), "data")
}

fn app_dir(base: Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    base.map(|base| base.join(APP_NAME))
        .with_context(|| format!("No {} directory for the current user", kind))
}
