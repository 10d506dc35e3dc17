use crate::domain::{TradeDetails, TradeRecord};
use crate::foundation::util::sync::lock_or_recover;
use crate::foundation::{Result, TransactionId};
use crate::infrastructure::rpc::DaemonClient;
use crate::infrastructure::storage::{KvStore, PersistedList};
use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type DetailFetch = Shared<BoxFuture<'static, TradeDetails>>;

/// Broadcast trade txids for one chain, with a session cache of `gettransaction` results.
///
/// The txid list is persisted; details are not. Concurrent lookups of one txid share a single
/// request. Failed lookups are cached as [`TradeDetails::Failed`] until [`refresh_all`]. A lookup
/// only caches its result while it is still the txid's current lookup: `remove`, `clear` and
/// `refresh_all` retire it.
///
/// [`refresh_all`]: TradeHistoryStore::refresh_all
pub struct TradeHistoryStore {
    txids: PersistedList<TransactionId>,
    daemon: DaemonClient,
    details: Mutex<HashMap<TransactionId, TradeDetails>>,
    in_flight: Mutex<HashMap<TransactionId, (u64, DetailFetch)>>,
    next_fetch: AtomicU64,
}

impl TradeHistoryStore {
    pub fn load(store: Arc<dyn KvStore>, key: impl Into<String>, daemon: DaemonClient, debounce: Duration) -> Self {
        Self {
            txids: PersistedList::load(store, key, debounce),
            daemon,
            details: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            next_fetch: AtomicU64::new(0),
        }
    }

    pub fn txids(&self) -> Vec<TransactionId> {
        self.txids.snapshot()
    }

    /// Every txid with whatever detail is already cached; never fetches.
    pub fn records(&self) -> Vec<TradeRecord> {
        let details = lock_or_recover(&self.details);
        self.txids.snapshot().into_iter().map(|txid| TradeRecord { details: details.get(&txid).cloned(), txid }).collect()
    }

    /// Append `txid` unless present and write the list through. Returns whether it was added.
    pub fn add(&self, txid: impl Into<TransactionId>) -> bool {
        let txid = txid.into();
        let added = self.txids.update(|items| {
            if items.contains(&txid) {
                return (false, false);
            }
            items.push(txid.clone());
            (true, true)
        });
        if added {
            info!("recorded trade txid={}", txid);
            // A failed write is logged by the list and retried by its writer.
            let _ = self.txids.flush();
        }
        added
    }

    pub fn remove(&self, txid: &str) -> bool {
        let removed = self.txids.update(|items| {
            let before = items.len();
            items.retain(|existing| existing.as_str() != txid);
            let removed = items.len() != before;
            (removed, removed)
        });
        lock_or_recover(&self.in_flight).remove(txid);
        lock_or_recover(&self.details).remove(txid);
        removed
    }

    pub fn clear(&self) {
        self.txids.update(|items| {
            let had_items = !items.is_empty();
            items.clear();
            (had_items, ())
        });
        lock_or_recover(&self.in_flight).clear();
        lock_or_recover(&self.details).clear();
    }

    pub fn cached_details(&self, txid: &str) -> Option<TradeDetails> {
        lock_or_recover(&self.details).get(txid).cloned()
    }

    /// Cached details for `txid`, fetching them once if absent.
    pub async fn get_details(&self, txid: &str) -> TradeDetails {
        if let Some(details) = self.cached_details(txid) {
            return details;
        }
        let (fetch_id, fetch) = self.join_or_start(txid);
        let details = fetch.await;

        let mut in_flight = lock_or_recover(&self.in_flight);
        if in_flight.get(txid).is_some_and(|(current, _)| *current == fetch_id) {
            in_flight.remove(txid);
            lock_or_recover(&self.details).insert(TransactionId::from(txid), details.clone());
        } else {
            debug!("discarding retired trade lookup txid={}", txid);
        }
        details
    }

    fn join_or_start(&self, txid: &str) -> (u64, DetailFetch) {
        let mut in_flight = lock_or_recover(&self.in_flight);
        if let Some((fetch_id, fetch)) = in_flight.get(txid) {
            debug!("joining in-flight trade lookup txid={}", txid);
            return (*fetch_id, fetch.clone());
        }
        let fetch_id = self.next_fetch.fetch_add(1, Ordering::Relaxed);
        let daemon = self.daemon.clone();
        let owned = txid.to_string();
        let fetch = async move {
            match daemon.get_transaction(&owned).await {
                Ok(value) => TradeDetails::Loaded(value),
                Err(err) => TradeDetails::Failed { error: err.user_message() },
            }
        }
        .boxed()
        .shared();
        in_flight.insert(TransactionId::from(txid), (fetch_id, fetch.clone()));
        (fetch_id, fetch)
    }

    /// Drop every cached detail and fetch all of them again.
    pub async fn refresh_all(&self) -> Vec<TradeRecord> {
        lock_or_recover(&self.details).clear();
        lock_or_recover(&self.in_flight).clear();
        let txids = self.txids.snapshot();
        info!("refreshing trade details count={}", txids.len());
        let details = join_all(txids.iter().map(|txid| self.get_details(txid))).await;
        txids.into_iter().zip(details).map(|(txid, details)| TradeRecord { txid, details: Some(details) }).collect()
    }

    pub fn flush(&self) -> Result<()> {
        self.txids.flush()
    }

    pub fn persisted(&self) -> &PersistedList<TransactionId> {
        &self.txids
    }
}
