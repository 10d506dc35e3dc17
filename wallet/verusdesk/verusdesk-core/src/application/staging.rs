use crate::domain::StagedDefinition;
use crate::foundation::util::sync::lock_or_recover;
use crate::foundation::{DeskError, Result, TransactionId, STAGED_DEFINITIONS_KEY};
use crate::infrastructure::rpc::DaemonClient;
use crate::infrastructure::storage::{KvStore, PersistedList};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Assembled-but-unrelayed currency definitions, newest first, unique by define txid.
///
/// Broadcasting never removes a record; the operator removes it explicitly. A record that was
/// relayed successfully refuses further broadcasts for the rest of the session, and one with a
/// relay still pending refuses them until that relay fails.
pub struct StagingLedger {
    records: PersistedList<StagedDefinition>,
    broadcasts: Mutex<HashMap<TransactionId, BroadcastState>>,
    daemon: DaemonClient,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum BroadcastState {
    InFlight,
    Relayed(TransactionId),
}

impl StagingLedger {
    pub fn load(store: Arc<dyn KvStore>, daemon: DaemonClient, debounce: Duration) -> Self {
        Self { records: PersistedList::load(store, STAGED_DEFINITIONS_KEY, debounce), broadcasts: Mutex::new(HashMap::new()), daemon }
    }

    pub fn list(&self) -> Vec<StagedDefinition> {
        self.records.snapshot()
    }

    pub fn get(&self, define_txid: &str) -> Option<StagedDefinition> {
        self.records.snapshot().into_iter().find(|record| record.define_txid.as_str() == define_txid)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Prepend `record` unless its define txid is already staged. Returns whether it was added.
    pub fn add(&self, record: StagedDefinition) -> bool {
        let define_txid = record.define_txid.clone();
        let added = self.records.update(|items| {
            if items.iter().any(|existing| existing.define_txid == record.define_txid) {
                return (false, false);
            }
            items.insert(0, record);
            (true, true)
        });
        if added {
            info!("staged currency definition define_txid={}", define_txid);
        } else {
            debug!("definition already staged define_txid={}", define_txid);
        }
        added
    }

    pub fn remove(&self, define_txid: &str) -> bool {
        let removed = self.records.update(|items| {
            let before = items.len();
            items.retain(|record| record.define_txid.as_str() != define_txid);
            let removed = items.len() != before;
            (removed, removed)
        });
        if removed {
            lock_or_recover(&self.broadcasts).remove(define_txid);
            info!("removed staged definition define_txid={}", define_txid);
        }
        removed
    }

    pub fn clear(&self) {
        let cleared = self.records.update(|items| {
            let count = items.len();
            items.clear();
            (count > 0, count)
        });
        lock_or_recover(&self.broadcasts).clear();
        info!("cleared staging ledger removed={}", cleared);
    }

    /// Network txid of a successful broadcast of this record, if one was observed.
    pub fn broadcast_txid(&self, define_txid: &str) -> Option<TransactionId> {
        match lock_or_recover(&self.broadcasts).get(define_txid) {
            Some(BroadcastState::Relayed(txid)) => Some(txid.clone()),
            _ => None,
        }
    }

    /// Relay the staged raw transaction with `sendrawtransaction`.
    pub async fn broadcast(&self, define_txid: &str) -> Result<TransactionId> {
        let record = self.get(define_txid).ok_or_else(|| DeskError::StagedNotFound(define_txid.to_string()))?;
        {
            let mut broadcasts = lock_or_recover(&self.broadcasts);
            match broadcasts.get(define_txid) {
                Some(BroadcastState::Relayed(txid)) => {
                    return Err(DeskError::AlreadyBroadcast { define_txid: define_txid.to_string(), txid: txid.to_string() });
                }
                Some(BroadcastState::InFlight) => return Err(DeskError::BroadcastInFlight(define_txid.to_string())),
                None => {
                    broadcasts.insert(record.define_txid.clone(), BroadcastState::InFlight);
                }
            }
        }

        let outcome = self.daemon.send_raw_transaction(&record.raw_hex).await;
        let mut broadcasts = lock_or_recover(&self.broadcasts);
        // The record may have been removed while the relay was pending.
        let still_pending = broadcasts.get(define_txid) == Some(&BroadcastState::InFlight);
        match outcome {
            Ok(txid) => {
                info!("broadcast staged definition define_txid={} txid={}", define_txid, txid);
                if still_pending {
                    broadcasts.insert(record.define_txid, BroadcastState::Relayed(txid.clone()));
                }
                Ok(txid)
            }
            Err(err) => {
                warn!("broadcast failed define_txid={} error={}", define_txid, err);
                if still_pending {
                    broadcasts.remove(define_txid);
                }
                Err(err)
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.records.flush()
    }

    pub fn persisted(&self) -> &PersistedList<StagedDefinition> {
        &self.records
    }
}
