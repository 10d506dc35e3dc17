//! RocksDB-backed key-value store.
//!
//! Values are stored as JSON bytes under their UTF-8 key in the default column family.

use crate::foundation::{DeskError, Result};
use crate::infrastructure::storage::KvStore;
use crate::{serde_err, storage_err};
use log::{debug, info};
use rocksdb::{Options, DB};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const DB_DIR_NAME: &str = "desk-state";

pub struct RocksKvStore {
    db: Arc<DB>,
}

impl RocksKvStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening RocksKvStore path={}", path.display());
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DB::open(&options, path).map_err(|err| storage_err!("rocksdb::DB::open", err))?;
        info!("RocksKvStore opened path={}", path.display());
        Ok(Self { db: Arc::new(db) })
    }

    /// Open (creating if needed) the store inside a data directory.
    pub fn open_in_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(DeskError::ConfigError("storage.data_dir is empty".to_string()));
        }
        fs::create_dir_all(dir).map_err(|err| storage_err!("fs::create_dir_all open_in_dir", err))?;
        Self::open(dir.join(DB_DIR_NAME))
    }
}

impl KvStore for RocksKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let Some(bytes) = self.db.get(key.as_bytes()).map_err(|err| storage_err!("rocksdb get", err))? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes).map(Some).map_err(|err| serde_err!("json", err))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let bytes = serde_json::to_vec(value).map_err(|err| serde_err!("json", err))?;
        self.db.put(key.as_bytes(), bytes).map_err(|err| storage_err!("rocksdb put", err))
    }
}
