use serde_json::Value;
use std::path::Path;
use verusdesk_core::foundation::{DeskError, Result};
use verusdesk_core::infrastructure::config::AppConfig;
use verusdesk_core::infrastructure::logging::init_logger;

pub fn init_logging(level: &str, app_config: Option<&AppConfig>) -> Result<()> {
    let log_dir = app_config.filter(|config| !config.storage.ephemeral).map(|config| Path::new(&config.storage.data_dir));
    init_logger(log_dir, level)
}

pub fn load_app_config() -> Result<AppConfig> {
    verusdesk_core::infrastructure::config::load_app_config()
}

/// Split `left=right`, both sides trimmed and non-empty.
pub fn split_pair<'a>(raw: &'a str, what: &str) -> Result<(&'a str, &'a str)> {
    match raw.split_once('=') {
        Some((left, right)) if !left.trim().is_empty() && !right.trim().is_empty() => Ok((left.trim(), right.trim())),
        _ => Err(DeskError::invalid_field(what, format!("expected key=value, got {raw:?}"))),
    }
}

pub fn parse_amount(raw: &str, what: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| DeskError::invalid_field(what, format!("not a number: {raw:?}")))
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
