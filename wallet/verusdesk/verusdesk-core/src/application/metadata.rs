use crate::domain::offer::compose::qualified_identity_name;
use crate::domain::offer::ResolvedAssetIntent;
use crate::foundation::util::sync::lock_or_recover;
use crate::infrastructure::rpc::DaemonClient;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

type MetadataFetch = Shared<BoxFuture<'static, Option<CurrencyMetadata>>>;

/// The parts of a `getcurrency` answer used for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrencyMetadata {
    pub currency_id: String,
    pub name: String,
    pub fully_qualified_name: Option<String>,
}

impl CurrencyMetadata {
    pub fn from_getcurrency(identifier: &str, response: &Value) -> Option<Self> {
        let name = response.get("name").and_then(Value::as_str)?;
        Some(Self {
            currency_id: response.get("currencyid").and_then(Value::as_str).unwrap_or(identifier).to_string(),
            name: name.to_string(),
            fully_qualified_name: response.get("fullyqualifiedname").and_then(Value::as_str).map(str::to_string),
        })
    }

    pub fn ticker(&self) -> &str {
        self.fully_qualified_name.as_deref().unwrap_or(&self.name)
    }
}

/// `getcurrency` lookups cached by identifier.
///
/// Only successful lookups are cached; a failed one is retried on the next request and displays
/// the raw identifier meanwhile.
pub struct CurrencyMetadataCache {
    daemon: DaemonClient,
    cache: Mutex<HashMap<String, CurrencyMetadata>>,
    /// Each started lookup gets an id so only its own awaiters clear the in-flight entry.
    in_flight: Mutex<HashMap<String, (u64, MetadataFetch)>>,
    next_fetch: AtomicU64,
}

impl CurrencyMetadataCache {
    pub fn new(daemon: DaemonClient) -> Self {
        Self { daemon, cache: Mutex::new(HashMap::new()), in_flight: Mutex::new(HashMap::new()), next_fetch: AtomicU64::new(0) }
    }

    pub fn cached(&self, identifier: &str) -> Option<CurrencyMetadata> {
        lock_or_recover(&self.cache).get(identifier).cloned()
    }

    pub async fn lookup(&self, identifier: &str) -> Option<CurrencyMetadata> {
        if let Some(metadata) = self.cached(identifier) {
            return Some(metadata);
        }
        let (fetch_id, fetch) = {
            let mut in_flight = lock_or_recover(&self.in_flight);
            match in_flight.get(identifier) {
                Some((fetch_id, fetch)) => (*fetch_id, fetch.clone()),
                None => {
                    let fetch_id = self.next_fetch.fetch_add(1, Ordering::Relaxed);
                    let daemon = self.daemon.clone();
                    let owned = identifier.to_string();
                    let fetch = async move {
                        match daemon.get_currency(&owned).await {
                            Ok(response) => CurrencyMetadata::from_getcurrency(&owned, &response),
                            Err(err) => {
                                warn!("currency lookup failed identifier={} error={}", owned, err);
                                None
                            }
                        }
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(identifier.to_string(), (fetch_id, fetch.clone()));
                    (fetch_id, fetch)
                }
            }
        };
        let metadata = fetch.await;
        let mut in_flight = lock_or_recover(&self.in_flight);
        if in_flight.get(identifier).is_some_and(|(current, _)| *current == fetch_id) {
            in_flight.remove(identifier);
        }
        drop(in_flight);
        if let Some(metadata) = &metadata {
            debug!("cached currency metadata identifier={} name={}", identifier, metadata.name);
            lock_or_recover(&self.cache).insert(identifier.to_string(), metadata.clone());
        }
        metadata
    }

    /// Friendly name for `identifier`, or the identifier itself when the lookup fails.
    pub async fn display_name(&self, identifier: &str) -> String {
        match self.lookup(identifier).await {
            Some(metadata) => metadata.ticker().to_string(),
            None => identifier.to_string(),
        }
    }

    /// `amount TICKER`, `name@` or `unrecognised` for a resolved fragment.
    pub async fn label(&self, intent: &ResolvedAssetIntent) -> String {
        match intent {
            ResolvedAssetIntent::Currency { currency, amount } => {
                let ticker = self.display_name(currency).await;
                match amount {
                    Some(amount) => format!("{} {}", format_amount(*amount), ticker),
                    None => ticker,
                }
            }
            ResolvedAssetIntent::Identity { identity_name, .. } => qualified_identity_name(identity_name),
            ResolvedAssetIntent::Unknown => "unrecognised".to_string(),
        }
    }
}

fn format_amount(amount: f64) -> String {
    let text = format!("{amount:.8}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}
