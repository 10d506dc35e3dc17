//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (`VERUSDESK_` prefix, `__` for nesting)

use crate::foundation::{DeskError, Result};
use crate::infrastructure::config::env::{CONFIG_FILE_NAME, ENV_PREFIX};
use crate::infrastructure::config::types::{AppConfig, DEFAULT_CHAIN, DEFAULT_RPC_URL};
use crate::infrastructure::rpc::redact_url;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::{debug, info};
use std::path::Path;

/// Load configuration from the default file in `data_dir`.
pub fn load_config(data_dir: &Path) -> Result<AppConfig> {
    load_config_from_file(&data_dir.join(CONFIG_FILE_NAME), data_dir)
}

pub fn load_config_from_file(path: &Path, data_dir: &Path) -> Result<AppConfig> {
    info!("loading configuration path={} data_dir={}", path.display(), data_dir.display());
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        debug!("configuration file missing; using defaults and env only path={}", path.display());
    }
    let mut config: AppConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| DeskError::ConfigError(format!("config extraction failed: {e}")))?;
    postprocess(&mut config, data_dir);
    debug!(
        "configuration loaded rpc_url={} chain={} ephemeral={}",
        redact_url(&config.node.rpc_url),
        config.node.chain,
        config.storage.ephemeral
    );
    Ok(config)
}

fn postprocess(config: &mut AppConfig, data_dir: &Path) {
    if config.storage.data_dir.trim().is_empty() {
        config.storage.data_dir = data_dir.to_string_lossy().to_string();
    }
    if config.node.rpc_url.trim().is_empty() {
        config.node.rpc_url = DEFAULT_RPC_URL.to_string();
    }
    if config.node.chain.trim().is_empty() {
        config.node.chain = DEFAULT_CHAIN.to_string();
    }
    for secret in [&mut config.node.rpc_user, &mut config.node.rpc_password] {
        if secret.as_deref().is_some_and(|value| value.trim().is_empty()) {
            *secret = None;
        }
    }
}
