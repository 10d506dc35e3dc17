use crate::storage_err;
use crate::foundation::Result;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "VERUSDESK_CONFIG_PATH";
pub const DATA_DIR_ENV: &str = "VERUSDESK_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "verusdesk.toml";
pub const NODE_URL_ENV: &str = "VERUSDESK_NODE__RPC_URL";

/// Prefix for environment overrides.
///
/// Example: `VERUSDESK_NODE__RPC_URL` -> `node.rpc_url`
pub const ENV_PREFIX: &str = "VERUSDESK_";

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub fn resolve_config_path(data_dir: &Path) -> PathBuf {
    match non_empty_env(CONFIG_PATH_ENV) {
        Some(path) => PathBuf::from(path),
        None => data_dir.join(CONFIG_FILE_NAME),
    }
}

pub fn resolve_data_dir() -> Result<PathBuf> {
    if let Some(dir) = non_empty_env(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let cwd = std::env::current_dir().map_err(|err| storage_err!("env::current_dir", err))?;
    Ok(cwd.join(".verusdesk"))
}
