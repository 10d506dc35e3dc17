use crate::foundation::{ChainTag, DEFAULT_PERSIST_DEBOUNCE_MS, DEFAULT_RPC_TIMEOUT_SECS, TRADE_HISTORY_KEY_PREFIX};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:27486";
pub const DEFAULT_CHAIN: &str = "VRSC";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub offers: OffersConfig,
}

/// Daemon connection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub rpc_url: String,
    #[serde(default)]
    pub rpc_user: Option<String>,
    #[serde(default)]
    pub rpc_password: Option<String>,
    #[serde(default)]
    pub timeout_secs: u64,
    /// Chain the daemon serves; scopes the trade history key.
    #[serde(default)]
    pub chain: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_user: None,
            rpc_password: None,
            timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            chain: DEFAULT_CHAIN.to_string(),
        }
    }
}

impl NodeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn chain_tag(&self) -> ChainTag {
        ChainTag::from(self.chain.trim())
    }

    pub fn trade_history_key(&self) -> String {
        format!("{TRADE_HISTORY_KEY_PREFIX}{}", self.chain_tag())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Defaults to the resolved data directory when empty.
    #[serde(default)]
    pub data_dir: String,
    /// Keep state in memory only; nothing survives the process.
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default)]
    pub persist_debounce_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: String::new(), ephemeral: false, persist_debounce_ms: DEFAULT_PERSIST_DEBOUNCE_MS }
    }
}

impl StorageConfig {
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OffersConfig {
    /// Fee passed to `makeoffer`/`takeoffer` when the operator does not give one.
    #[serde(default)]
    pub default_fee: Option<f64>,
    /// Also list expired offers in `listopenoffers`.
    #[serde(default)]
    pub include_expired: bool,
}
