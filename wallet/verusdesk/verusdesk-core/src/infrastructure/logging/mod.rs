//! Logger setup on `log` + `log4rs`.
//!
//! Filter expressions are comma separated: a bare level sets the level of our own crates,
//! `<module>=<level>` targets one module, and `root=<level>` opts every third-party crate in.

mod consts;

pub use consts::*;

use crate::foundation::{DeskError, Result};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use std::io::IsTerminal;
use std::path::Path;

const CONSOLE_APPENDER: &str = "stderr";
const LOG_FILE_APPENDER: &str = "log_file";

/// Parsed form of a filter expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFilters {
    pub app_level: LevelFilter,
    pub root_level: LevelFilter,
    pub module_levels: Vec<(String, LevelFilter)>,
}

impl LogFilters {
    pub fn parse(filters: &str) -> Self {
        let mut parsed = Self { app_level: LevelFilter::Info, root_level: LevelFilter::Off, module_levels: Vec::new() };
        let mut app_level_set = false;
        for part in filters.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            match part.split_once('=') {
                None => {
                    if let (false, Ok(level)) = (app_level_set, part.parse()) {
                        parsed.app_level = level;
                        app_level_set = true;
                    }
                }
                Some((module, level)) => {
                    let (module, level) = (module.trim(), level.trim());
                    let Ok(level) = level.parse::<LevelFilter>() else {
                        continue;
                    };
                    if module == "root" {
                        parsed.root_level = level;
                    } else if !module.is_empty() {
                        parsed.module_levels.push((module.to_string(), level));
                    }
                }
            }
        }
        parsed
    }
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    let archive_pattern = dir.join(format!("{LOG_FILE_NAME}.{{}}.gz"));
    let archive_pattern = archive_pattern
        .to_str()
        .ok_or_else(|| DeskError::ConfigError(format!("log dir is not valid UTF-8: {}", dir.display())))?;
    let roller = FixedWindowRoller::builder()
        .base(1)
        .build(archive_pattern, LOG_FILE_MAX_ROLLS)
        .map_err(|err| DeskError::ConfigError(format!("log roller: {err}")))?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(LOG_FILE_MAX_SIZE)), Box::new(roller));
    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
        .build(dir.join(LOG_FILE_NAME), Box::new(policy))
        .map_err(|err| DeskError::ConfigError(format!("log file appender: {err}")))
}

/// Build the log4rs configuration for `filters`, with an optional rolling file under `log_dir`.
pub fn build_config(log_dir: Option<&Path>, filters: &str) -> Result<Config> {
    let filters = LogFilters::parse(filters);
    let console_pattern = if std::io::stderr().is_terminal() { LOG_LINE_PATTERN_COLORED } else { LOG_LINE_PATTERN };
    let console = ConsoleAppender::builder().target(Target::Stderr).encoder(Box::new(PatternEncoder::new(console_pattern))).build();

    let mut builder = Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    let mut appenders = vec![CONSOLE_APPENDER.to_string()];
    if let Some(dir) = log_dir {
        builder = builder.appender(Appender::builder().build(LOG_FILE_APPENDER, Box::new(file_appender(dir)?)));
        appenders.push(LOG_FILE_APPENDER.to_string());
    }

    for crate_name in WHITELISTED_CRATES {
        if !filters.module_levels.iter().any(|(module, _)| module == crate_name) {
            builder = builder.logger(Logger::builder().appenders(appenders.clone()).additive(false).build(*crate_name, filters.app_level));
        }
    }
    for (module, level) in &filters.module_levels {
        builder = builder.logger(Logger::builder().appenders(appenders.clone()).additive(false).build(module, *level));
    }

    builder
        .build(Root::builder().appenders(appenders).build(filters.root_level))
        .map_err(|err| DeskError::ConfigError(format!("logger config: {err}")))
}

/// Install the global logger. Later calls are ignored.
pub fn init_logger(log_dir: Option<&Path>, filters: &str) -> Result<()> {
    let config = build_config(log_dir, filters)?;
    let _ = log4rs::init_config(config);
    Ok(())
}
