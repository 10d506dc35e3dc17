use crate::domain::offer::{MakeOfferOutcome, MakeOfferRequest, TakeOfferRequest};
use crate::foundation::{DeskError, Result, TransactionId};
use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub mod http;

pub use http::{redact_url, HttpNodeRpc};

/// Command-and-positional-params access to the daemon.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    async fn invoke(&self, command: &str, params: Vec<Value>) -> Result<Value>;
}

/// `definecurrency` result: the signed definition transaction, not yet relayed.
#[derive(Clone, Debug, PartialEq)]
pub struct DefineCurrencyOutcome {
    pub txid: TransactionId,
    pub hex: String,
}

#[derive(Deserialize)]
struct DefineCurrencyRaw {
    tx: DefineCurrencyTx,
    hex: String,
}

#[derive(Deserialize)]
struct DefineCurrencyTx {
    txid: String,
}

/// Text of an `{error}` object embedded in a successful RPC result, if present.
pub fn embedded_error(value: &Value) -> Option<String> {
    let error = value.as_object()?.get("error")?;
    match error {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(body) => Some(body.get("message").and_then(Value::as_str).map(str::to_string).unwrap_or_else(|| error.to_string())),
        other => Some(other.to_string()),
    }
}

/// Typed wrapper over [`NodeRpc`] for the daemon commands this crate consumes.
#[derive(Clone)]
pub struct DaemonClient {
    rpc: Arc<dyn NodeRpc>,
}

impl DaemonClient {
    pub fn new(rpc: Arc<dyn NodeRpc>) -> Self {
        Self { rpc }
    }

    /// Invoke and turn a returned `{error}` object into [`DeskError::DaemonRejected`].
    pub async fn call(&self, command: &str, params: Vec<Value>) -> Result<Value> {
        debug!("daemon call command={} params={}", command, params.len());
        let value = self.rpc.invoke(command, params).await?;
        if let Some(message) = embedded_error(&value) {
            warn!("daemon returned error command={} message={}", command, message);
            return Err(DeskError::daemon_rejected(command, message));
        }
        Ok(value)
    }

    pub async fn define_currency(&self, params: &Value) -> Result<DefineCurrencyOutcome> {
        let value = self.call("definecurrency", vec![params.clone()]).await?;
        let raw: DefineCurrencyRaw =
            serde_json::from_value(value).map_err(|err| DeskError::unexpected_response("definecurrency", err.to_string()))?;
        Ok(DefineCurrencyOutcome { txid: TransactionId::from(raw.tx.txid), hex: raw.hex })
    }

    pub async fn send_raw_transaction(&self, hex: &str) -> Result<TransactionId> {
        let value = self.call("sendrawtransaction", vec![json!(hex)]).await?;
        value
            .as_str()
            .map(TransactionId::from)
            .ok_or_else(|| DeskError::unexpected_response("sendrawtransaction", format!("expected txid string, got {value}")))
    }

    pub async fn get_offers(&self, currency_or_id: &str, is_currency: bool, with_tx: bool) -> Result<Value> {
        self.call("getoffers", vec![json!(currency_or_id), json!(is_currency), json!(with_tx)]).await
    }

    pub async fn list_open_offers(&self, unexpired: bool, expired: bool) -> Result<Value> {
        self.call("listopenoffers", vec![json!(unexpired), json!(expired)]).await
    }

    pub async fn make_offer(&self, request: &MakeOfferRequest) -> Result<MakeOfferOutcome> {
        let value = self.call("makeoffer", request.to_params()).await?;
        serde_json::from_value(value).map_err(|err| DeskError::unexpected_response("makeoffer", err.to_string()))
    }

    /// Returns the broadcast txid, or the raw transaction when only the hex was requested.
    pub async fn take_offer(&self, request: &TakeOfferRequest) -> Result<String> {
        let value = self.call("takeoffer", request.to_params()).await?;
        match &value {
            Value::String(result) => Ok(result.clone()),
            Value::Object(body) => body
                .get("txid")
                .or_else(|| body.get("hex"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| DeskError::unexpected_response("takeoffer", value.to_string())),
            other => Err(DeskError::unexpected_response("takeoffer", other.to_string())),
        }
    }

    pub async fn close_offers(&self, txids: &[TransactionId]) -> Result<Value> {
        if txids.is_empty() {
            return Err(DeskError::missing_field("offer txids"));
        }
        self.call("closeoffers", vec![json!(txids)]).await
    }

    pub async fn get_currency(&self, identifier: &str) -> Result<Value> {
        let value = self.call("getcurrency", vec![json!(identifier)]).await?;
        if value.is_null() {
            return Err(DeskError::unexpected_response("getcurrency", format!("unknown currency {identifier}")));
        }
        Ok(value)
    }

    pub async fn get_identity(&self, identifier: &str) -> Result<Value> {
        self.call("getidentity", vec![json!(identifier)]).await
    }

    pub async fn get_transaction(&self, txid: &str) -> Result<Value> {
        self.call("gettransaction", vec![json!(txid)]).await
    }
}
