use crate::foundation::{DeskError, Result};
use crate::infrastructure::storage::KvStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-process store for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Value>>,
    unavailable: AtomicBool,
    writes: AtomicU64,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: impl Into<String>, value: Value) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.into(), value);
        }
        self
    }

    /// Make every subsequent read and write fail, as an unreachable backend would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn lock_entries(&self, operation: &str) -> Result<MutexGuard<'_, HashMap<String, Value>>> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(DeskError::StorageError { operation: operation.to_string(), details: "store unavailable".to_string() });
        }
        self.entries
            .lock()
            .map_err(|_| DeskError::StorageError { operation: format!("{operation} lock"), details: "poisoned".to_string() })
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock_entries("memory kv get")?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.lock_entries("memory kv set")?.insert(key.to_string(), value.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
