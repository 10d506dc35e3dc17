//! JSON-RPC 1.0 over HTTP POST with basic auth, as spoken by the daemon.

use crate::foundation::{DeskError, Result};
use crate::infrastructure::rpc::NodeRpc;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Deserialize)]
struct JsonRpcErrorBody {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct JsonRpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Clone)]
enum RpcFailure {
    Transport(String),
    Http { status: StatusCode, body: String },
    InvalidJson { error: String, body: String },
    JsonRpc { code: i64, message: String },
}

impl RpcFailure {
    fn summary(&self) -> String {
        match self {
            RpcFailure::Transport(message) => format!("transport_error={message}"),
            RpcFailure::Http { status, body } => format!("http_status={status} body={body}"),
            RpcFailure::InvalidJson { error, body } => format!("invalid_json_error={error} body={body}"),
            RpcFailure::JsonRpc { code, message } => format!("json_rpc_error code={code} message={message}"),
        }
    }

    fn into_error(self, command: &str) -> DeskError {
        match self {
            RpcFailure::JsonRpc { message, .. } => DeskError::daemon_rejected(command, message),
            RpcFailure::Transport(message) => DeskError::NodeRpcError(message),
            other => DeskError::NodeRpcError(format!("{command} failed: {}", other.summary())),
        }
    }
}

/// Replace any `user:password@` userinfo with a placeholder.
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let (scheme, rest) = url.split_at(scheme_end + 3);
    let host_end = rest.find('/').unwrap_or(rest.len());
    let Some(at) = rest[..host_end].rfind('@') else {
        return url.to_string();
    };
    format!("{scheme}<redacted>@{}", &rest[at + 1..])
}

pub struct HttpNodeRpc {
    client: Client,
    url: String,
    redacted_url: String,
    user: Option<String>,
    password: Option<String>,
    next_id: AtomicU64,
}

impl HttpNodeRpc {
    pub fn new(url: impl Into<String>, user: Option<String>, password: Option<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        let redacted_url = redact_url(&url);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DeskError::NodeRpcError(format!("http client build failed url={} error={}", redacted_url, err)))?;
        info!("daemon rpc client configured url={} timeout_secs={}", redacted_url, timeout.as_secs());
        Ok(Self { client, url, redacted_url, user, password, next_id: AtomicU64::new(1) })
    }

    pub fn redacted_url(&self) -> &str {
        &self.redacted_url
    }

    async fn post(&self, command: &str, params: Vec<Value>) -> std::result::Result<Value, RpcFailure> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({"jsonrpc": "1.0", "id": id, "method": command, "params": params});
        let mut req = self.client.post(&self.url).json(&payload);
        if let Some(user) = self.user.as_deref() {
            req = req.basic_auth(user, self.password.as_deref());
        }
        let resp = req.send().await.map_err(|err| RpcFailure::Transport(err.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        // The daemon reports command errors with a 500 status and a normal envelope.
        match serde_json::from_str::<JsonRpcEnvelope>(&body) {
            Ok(JsonRpcEnvelope { error: Some(error), .. }) => Err(RpcFailure::JsonRpc { code: error.code, message: error.message }),
            Ok(envelope) if status.is_success() => Ok(envelope.result.unwrap_or(Value::Null)),
            Ok(_) => Err(RpcFailure::Http { status, body }),
            Err(_) if !status.is_success() => Err(RpcFailure::Http { status, body }),
            Err(err) => Err(RpcFailure::InvalidJson { error: err.to_string(), body }),
        }
    }
}

#[async_trait]
impl NodeRpc for HttpNodeRpc {
    async fn invoke(&self, command: &str, params: Vec<Value>) -> Result<Value> {
        match self.post(command, params).await {
            Ok(value) => {
                debug!("rpc ok url={} command={}", self.redacted_url, command);
                Ok(value)
            }
            Err(failure) => {
                error!("rpc failed url={} command={} {}", self.redacted_url, command, failure.summary());
                Err(failure.into_error(command))
            }
        }
    }
}
