/// Log file name.
pub const LOG_FILE_NAME: &str = "verusdesk.log";

/// Console pattern: `timestamp [LEVEL] message [module]`.
pub const LOG_LINE_PATTERN_COLORED: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{h({l:5})}] {m} [{M}]{n}";

/// File pattern (no colors).
pub const LOG_LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l:5}] {m} [{M}]{n}";

/// Rotate the log file past 10 MB.
pub const LOG_FILE_MAX_SIZE: u64 = 10_000_000;

pub const LOG_FILE_MAX_ROLLS: u32 = 3;

/// Crates logged at the app level by default; everything else stays off unless opted in.
pub const WHITELISTED_CRATES: &[&str] = &["verusdesk_core", "verusdesk"];
