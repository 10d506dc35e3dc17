//! Structural classification of untyped `offer` / `accept` fragments.
//!
//! The daemon does not tag fragments, so the shape decides: `{name, identityid}` is an identity,
//! `{currency, amount}` is a currency amount, and a `{TICKER: amount}` map is a currency amount
//! keyed by its first usable key. Anything else is `Unknown` and needs manual entry.

use crate::foundation::util::json::value_as_f64;
use serde::Serialize;
use serde_json::Value;

/// Keys the daemon uses for metadata inside offer fragments. Never read as a currency ticker.
///
/// A key missing from this list is read as a ticker, so new daemon fields must be added here.
pub const NON_CURRENCY_KEYS: &[&str] = &[
    "txid",
    "type",
    "blockexpiry",
    "expiryheight",
    "height",
    "blockheight",
    "confirmations",
    "name",
    "fullyqualifiedname",
    "identityid",
    "identity",
    "address",
    "addresses",
    "primaryaddresses",
    "parent",
    "systemid",
    "minimumsignatures",
    "revocationauthority",
    "recoveryauthority",
    "privateaddress",
    "contentmap",
    "contentmultimap",
    "flags",
    "version",
    "timelock",
    "currency",
    "currencyid",
    "currencyvalues",
    "currencies",
    "amount",
    "amounts",
    "reserveoutput",
    "nativeout",
    "destination",
    "destinationaddress",
    "changeaddress",
    "fee",
    "fees",
    "offer",
    "accept",
    "for",
    "hex",
    "tx",
    "oprettxid",
    "isidentity",
    "iscurrency",
    "status",
    "error",
];

/// What an offer fragment asks for or gives, in typed form.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedAssetIntent {
    Currency {
        currency: String,
        /// `None` when the daemon value is not numeric.
        amount: Option<f64>,
    },
    Identity {
        identity_name: String,
        identity_id: String,
    },
    Unknown,
}

impl ResolvedAssetIntent {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ResolvedAssetIntent::Unknown)
    }

    /// Currency identifier to look up for display, if any.
    pub fn currency_id(&self) -> Option<&str> {
        match self {
            ResolvedAssetIntent::Currency { currency, .. } => Some(currency),
            _ => None,
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Classify one fragment. Pure and deterministic; key order follows the daemon's response.
pub fn classify(fragment: &Value) -> ResolvedAssetIntent {
    let Some(object) = fragment.as_object() else {
        return ResolvedAssetIntent::Unknown;
    };
    if let (Some(name), Some(identity_id)) = (object.get("name"), object.get("identityid")) {
        return ResolvedAssetIntent::Identity { identity_name: text(name), identity_id: text(identity_id) };
    }
    if let (Some(currency), Some(amount)) = (object.get("currency"), object.get("amount")) {
        return ResolvedAssetIntent::Currency { currency: text(currency), amount: value_as_f64(amount) };
    }
    object
        .iter()
        .filter(|(key, _)| !NON_CURRENCY_KEYS.contains(&key.as_str()))
        .find(|(_, value)| !matches!(value, Value::Object(_) | Value::Array(_) | Value::Null))
        .map(|(ticker, amount)| ResolvedAssetIntent::Currency { currency: ticker.clone(), amount: value_as_f64(amount) })
        .unwrap_or(ResolvedAssetIntent::Unknown)
}
