//! Normalization of `getoffers` / `listopenoffers` responses.

use crate::foundation::TransactionId;
use log::debug;
use serde::Serialize;
use serde_json::Value;

/// Flatten an offer listing into one array.
///
/// Arrays pass through; a grouped object (offers keyed by currency) yields the concatenation of its
/// array values; anything else, including `{}` and `null`, yields an empty list.
pub fn flatten(raw: &Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items.clone(),
        Value::Object(groups) => groups.values().filter_map(Value::as_array).flat_map(|items| items.iter().cloned()).collect(),
        _ => Vec::new(),
    }
}

/// One listed offer. `offer` is what the maker gives, `accept` what the maker wants back.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OfferRecord {
    pub txid: TransactionId,
    pub block_expiry: Option<u64>,
    pub offer: Value,
    pub accept: Value,
}

impl OfferRecord {
    /// Decode one flattened entry. The daemon nests the txid and fragments under `offer` in
    /// `getoffers` output and leaves them at the top level in `listopenoffers` output.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let body = match entry.get("offer") {
            Some(inner) if inner.get("txid").is_some() => inner,
            _ => entry,
        };
        let txid = body.get("txid").or_else(|| entry.get("txid")).and_then(Value::as_str)?;
        let block_expiry = body.get("blockexpiry").or_else(|| entry.get("blockexpiry")).and_then(Value::as_u64);
        Some(Self {
            txid: TransactionId::from(txid),
            block_expiry,
            offer: body.get("offer").cloned().unwrap_or(Value::Null),
            accept: body.get("accept").cloned().unwrap_or(Value::Null),
        })
    }

    pub fn is_expired_at(&self, height: u64) -> bool {
        self.block_expiry.is_some_and(|expiry| expiry <= height)
    }
}

/// Flatten and decode, dropping entries without a txid.
pub fn decode_offers(raw: &Value) -> Vec<OfferRecord> {
    let entries = flatten(raw);
    let total = entries.len();
    let records: Vec<OfferRecord> = entries.iter().filter_map(OfferRecord::from_value).collect();
    if records.len() != total {
        debug!("offer listing contained undecodable entries total={} decoded={}", total, records.len());
    }
    records
}
