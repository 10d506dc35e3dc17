use crate::foundation::TransactionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A currency definition the daemon assembled and signed but that has not been relayed yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StagedDefinition {
    /// The exact parameter object sent to `definecurrency`.
    pub input_params: Value,
    /// Txid of the definition transaction; the ledger's identity key.
    pub define_txid: TransactionId,
    pub raw_hex: String,
}

impl StagedDefinition {
    pub fn new(input_params: Value, define_txid: impl Into<TransactionId>, raw_hex: impl Into<String>) -> Self {
        Self { input_params, define_txid: define_txid.into(), raw_hex: raw_hex.into() }
    }

    /// Currency name from the stored parameters, for listings.
    pub fn currency_name(&self) -> Option<&str> {
        self.input_params.get("name").and_then(Value::as_str)
    }
}

/// Outcome of a `gettransaction` lookup. Failures are cached like successes until a refresh.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TradeDetails {
    Loaded(Value),
    Failed { error: String },
}

impl TradeDetails {
    pub fn is_failed(&self) -> bool {
        matches!(self, TradeDetails::Failed { .. })
    }

    pub fn confirmations(&self) -> Option<i64> {
        match self {
            TradeDetails::Loaded(value) => value.get("confirmations").and_then(Value::as_i64),
            TradeDetails::Failed { .. } => None,
        }
    }
}

/// One trade txid with whatever detail has been fetched for it this session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TradeRecord {
    pub txid: TransactionId,
    pub details: Option<TradeDetails>,
}
