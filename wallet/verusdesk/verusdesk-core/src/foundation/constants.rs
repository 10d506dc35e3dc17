//! System-wide constants for verusdesk.

/// Source address accepted by the daemon as "any address in this wallet".
///
/// Valid as a `fromaddress`, rejected when used as a change address.
pub const WILDCARD_ADDRESS: &str = "*";

/// Suffix marking a fully qualified identity name.
pub const IDENTITY_SUFFIX: char = '@';

/// Store key holding the staged currency-definition list.
pub const STAGED_DEFINITIONS_KEY: &str = "staged_definitions";

/// Prefix of the chain-scoped store key holding broadcast trade txids.
pub const TRADE_HISTORY_KEY_PREFIX: &str = "trade_history_";

/// Default debounce applied to background persistence writes (milliseconds).
pub const DEFAULT_PERSIST_DEBOUNCE_MS: u64 = 250;

/// Default JSON-RPC request timeout (seconds).
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Smallest minimum-signatures value the daemon accepts for an identity.
pub const MIN_IDENTITY_SIGNATURES: i64 = 1;
