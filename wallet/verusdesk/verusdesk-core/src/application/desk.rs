use crate::application::currency::define_currency;
use crate::application::metadata::CurrencyMetadataCache;
use crate::application::offers::OfferDesk;
use crate::application::staging::StagingLedger;
use crate::application::trades::TradeHistoryStore;
use crate::domain::currency::CurrencyDefinitionDraft;
use crate::domain::StagedDefinition;
use crate::foundation::Result;
use crate::infrastructure::config::{AppConfig, StorageConfig};
use crate::infrastructure::rpc::{DaemonClient, HttpNodeRpc, NodeRpc};
use crate::infrastructure::storage::{KvStore, MemoryKvStore, RocksKvStore};
use log::{info, warn};
use std::sync::Arc;

/// Open the configured key-value store.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KvStore>> {
    if config.ephemeral {
        info!("using in-memory store; staged definitions and trades will not survive a restart");
        return Ok(Arc::new(MemoryKvStore::new()));
    }
    Ok(Arc::new(RocksKvStore::open_in_dir(&config.data_dir)?))
}

/// Every long-lived component, wired for one daemon and one store.
pub struct Desk {
    pub daemon: DaemonClient,
    pub staging: Arc<StagingLedger>,
    pub trades: Arc<TradeHistoryStore>,
    pub metadata: Arc<CurrencyMetadataCache>,
    pub offers: OfferDesk,
}

impl Desk {
    pub fn new(config: &AppConfig, rpc: Arc<dyn NodeRpc>, store: Arc<dyn KvStore>) -> Self {
        let daemon = DaemonClient::new(rpc);
        let debounce = config.storage.persist_debounce();
        let staging = Arc::new(StagingLedger::load(store.clone(), daemon.clone(), debounce));
        let trades = Arc::new(TradeHistoryStore::load(store, config.node.trade_history_key(), daemon.clone(), debounce));
        let metadata = Arc::new(CurrencyMetadataCache::new(daemon.clone()));
        let offers = OfferDesk::new(daemon.clone(), metadata.clone(), trades.clone(), config.offers.clone());
        info!("desk ready chain={} staged={} trades={}", config.node.chain_tag(), staging.len(), trades.txids().len());
        Self { daemon, staging, trades, metadata, offers }
    }

    /// Build the HTTP transport and the configured store, then wire the desk.
    pub fn connect(config: &AppConfig) -> Result<Self> {
        let rpc = HttpNodeRpc::new(
            &config.node.rpc_url,
            config.node.rpc_user.clone(),
            config.node.rpc_password.clone(),
            config.node.timeout(),
        )?;
        let store = open_store(&config.storage)?;
        Ok(Self::new(config, Arc::new(rpc), store))
    }

    pub async fn define_currency(&self, draft: &CurrencyDefinitionDraft) -> Result<StagedDefinition> {
        define_currency(&self.daemon, &self.staging, draft).await
    }

    /// Write pending state of both ledgers. Both are attempted even if the first fails.
    pub fn flush(&self) -> Result<()> {
        let staged = self.staging.flush();
        let trades = self.trades.flush();
        if let Err(err) = &staged {
            warn!("flushing staged definitions failed error={}", err);
        }
        staged.and(trades)
    }
}
