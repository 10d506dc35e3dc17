use crate::foundation::Result;
use serde_json::Value;

/// Flat key-value persistence for whole-list snapshots.
///
/// Values are JSON documents; a key that was never written reads as `None`.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: &Value) -> Result<()>;
}
