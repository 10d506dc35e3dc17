//! A list owned in memory and mirrored to a [`KvStore`] key.
//!
//! Loaded once on construction. Every mutation publishes a new versioned snapshot on a watch
//! channel; a background writer waits out the debounce and then persists whatever snapshot is
//! newest at that moment. Store failures are logged and counted; the in-memory list keeps working.

use crate::foundation::util::sync::lock_or_recover;
use crate::foundation::Result;
use crate::infrastructure::storage::KvStore;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug)]
pub struct Snapshot<T> {
    pub version: u64,
    pub items: Vec<T>,
}

struct Sink {
    key: String,
    store: Arc<dyn KvStore>,
    persisted_version: Mutex<u64>,
    failures: AtomicU64,
}

impl Sink {
    /// Write `snapshot` unless something at least as new is already stored.
    fn write<T: Serialize>(&self, snapshot: &Snapshot<T>) -> Result<()> {
        let mut persisted = lock_or_recover(&self.persisted_version);
        if snapshot.version <= *persisted {
            return Ok(());
        }
        let value = serde_json::to_value(&snapshot.items)?;
        match self.store.set(&self.key, &value) {
            Ok(()) => {
                *persisted = snapshot.version;
                debug!("persisted list key={} version={} len={}", self.key, snapshot.version, snapshot.items.len());
                Ok(())
            }
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!("list persistence failed key={} version={} error={}", self.key, snapshot.version, err);
                Err(err)
            }
        }
    }
}

pub struct PersistedList<T> {
    items: Mutex<Vec<T>>,
    version: AtomicU64,
    snapshots: watch::Sender<Arc<Snapshot<T>>>,
    sink: Arc<Sink>,
    has_writer: bool,
}

impl<T> PersistedList<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Load `key` from `store` and start the debounced writer.
    ///
    /// Outside a tokio runtime there is no writer task and each mutation is written immediately.
    pub fn load(store: Arc<dyn KvStore>, key: impl Into<String>, debounce: Duration) -> Self {
        let key = key.into();
        let items = load_items::<T>(store.as_ref(), &key);
        info!("loaded persisted list key={} len={}", key, items.len());

        let (snapshots, rx) = watch::channel(Arc::new(Snapshot { version: 0, items: items.clone() }));
        let sink = Arc::new(Sink { key, store, persisted_version: Mutex::new(0), failures: AtomicU64::new(0) });
        let has_writer = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(run_writer(rx, Arc::clone(&sink), debounce));
                true
            }
            Err(_) => false,
        };
        Self { items: Mutex::new(items), version: AtomicU64::new(0), snapshots, sink, has_writer }
    }

    pub fn key(&self) -> &str {
        &self.sink.key
    }

    pub fn snapshot(&self) -> Vec<T> {
        lock_or_recover(&self.items).clone()
    }

    pub fn len(&self) -> usize {
        lock_or_recover(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receive every published snapshot, newest first on `borrow()`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<T>>> {
        self.snapshots.subscribe()
    }

    /// Apply `mutate` and publish the result if it reports a change.
    ///
    /// The snapshot is published while the list lock is held, so snapshot order matches
    /// mutation order.
    pub fn update<R>(&self, mutate: impl FnOnce(&mut Vec<T>) -> (bool, R)) -> R {
        let mut items = lock_or_recover(&self.items);
        let (changed, result) = mutate(&mut items);
        if changed {
            let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
            let snapshot = Arc::new(Snapshot { version, items: items.clone() });
            if !self.has_writer {
                let _ = self.sink.write(&snapshot);
            }
            self.snapshots.send_replace(snapshot);
        }
        result
    }

    /// Write the current state now, bypassing the debounce.
    pub fn flush(&self) -> Result<()> {
        let snapshot = self.snapshots.borrow().clone();
        self.sink.write(&snapshot)
    }

    /// Failed store writes since construction.
    pub fn persist_failures(&self) -> u64 {
        self.sink.failures.load(Ordering::Relaxed)
    }
}

fn load_items<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Vec<T> {
    match store.get(key) {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|err| {
            warn!("discarding unreadable persisted list key={} error={}", key, err);
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!("persisted list unavailable, starting empty key={} error={}", key, err);
            Vec::new()
        }
    }
}

async fn run_writer<T: Serialize + Send + Sync>(mut rx: watch::Receiver<Arc<Snapshot<T>>>, sink: Arc<Sink>, debounce: Duration) {
    while rx.changed().await.is_ok() {
        if !debounce.is_zero() {
            tokio::time::sleep(debounce).await;
        }
        let snapshot = rx.borrow_and_update().clone();
        let _ = sink.write(&snapshot);
    }
    debug!("persisted list writer stopped key={}", sink.key);
}
