mod env;
mod loader;
mod types;
pub mod validation;

pub use env::{resolve_config_path, resolve_data_dir, CONFIG_FILE_NAME, CONFIG_PATH_ENV, DATA_DIR_ENV, ENV_PREFIX, NODE_URL_ENV};
pub use loader::{load_config, load_config_from_file};
pub use types::*;

use crate::foundation::{DeskError, Result};
use std::path::Path;

/// Resolve the data directory and config path from the environment, load, and validate.
pub fn load_app_config() -> Result<AppConfig> {
    let data_dir = resolve_data_dir()?;
    let config_path = resolve_config_path(&data_dir);
    load_app_config_from_path(&config_path, &data_dir)
}

pub fn load_app_config_from_path(path: &Path, data_dir: &Path) -> Result<AppConfig> {
    let config = load_config_from_file(path, data_dir)?;
    config.validate().map_err(|errors| DeskError::ConfigError(format!("validation failed: {}", errors.join("; "))))?;
    Ok(config)
}
