//! Take-offer request composition and its local validation gates.

use crate::domain::offer::resolver::ResolvedAssetIntent;
use crate::foundation::{DeskError, Result, TransactionId, IDENTITY_SUFFIX, MIN_IDENTITY_SIGNATURES, WILDCARD_ADDRESS};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Operator-typed currency and amount used when the resolver could not read a fragment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualAsset {
    pub currency: String,
    pub amount: f64,
}

/// Current on-chain state of an identity being accepted, from `getidentity`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IdentityAcceptDetails {
    pub parent: Option<String>,
    pub primary_addresses: Vec<String>,
    pub minimum_signatures: i64,
    pub revocation_authority: Option<String>,
    pub recovery_authority: Option<String>,
    pub private_address: Option<String>,
}

impl IdentityAcceptDetails {
    /// Read the `identity` object of a `getidentity` response. Missing fields stay empty.
    pub fn from_getidentity(response: &Value) -> Self {
        let identity = response.get("identity").unwrap_or(response);
        let string = |key: &str| identity.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            parent: string("parent"),
            primary_addresses: identity
                .get("primaryaddresses")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
            minimum_signatures: identity.get("minimumsignatures").and_then(Value::as_i64).unwrap_or(MIN_IDENTITY_SIGNATURES),
            revocation_authority: string("revocationauthority"),
            recovery_authority: string("recoveryauthority"),
            private_address: string("privateaddress"),
        }
    }
}

/// Everything the operator supplies or the resolver derived for one take-offer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TakeOfferInput {
    pub offer_txid: TransactionId,
    /// Resolved from the offer's `accept` fragment: what the local user hands over.
    pub deliver: Option<ResolvedAssetIntent>,
    /// Resolved from the offer's `offer` fragment: what the local user receives.
    pub accept: Option<ResolvedAssetIntent>,
    pub manual_deliver: Option<ManualAsset>,
    pub manual_accept: Option<ManualAsset>,
    pub from_address: String,
    pub change_address: Option<String>,
    /// Destination for an accepted currency amount.
    pub accept_address: Option<String>,
    /// Replaces the primary addresses of an accepted identity.
    pub new_primary_address: Option<String>,
    pub identity_details: Option<IdentityAcceptDetails>,
    pub minimum_signatures: Option<i64>,
    pub revocation_authority: Option<String>,
    pub recovery_authority: Option<String>,
    pub private_address: Option<String>,
    pub return_tx_only: bool,
    pub fee_amount: Option<f64>,
}

/// A validated `takeoffer` call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TakeOfferRequest {
    pub from_address: String,
    pub offerdata: Value,
    pub return_tx_only: bool,
    pub fee_amount: Option<f64>,
}

impl TakeOfferRequest {
    /// Positional parameters. Optional trailing arguments are only sent when something needs them.
    pub fn to_params(&self) -> Vec<Value> {
        let mut params = vec![Value::String(self.from_address.clone()), self.offerdata.clone()];
        if self.return_tx_only || self.fee_amount.is_some() {
            params.push(Value::Bool(self.return_tx_only));
        }
        if let Some(fee) = self.fee_amount {
            params.push(json!(fee));
        }
        params
    }
}

/// Trimmed, non-empty text or `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// The change address rule shared by take and make: explicit wins, else the source address unless
/// it is the wildcard, in which case the key is left out.
pub(crate) fn resolve_change_address(from_address: &str, explicit: Option<&str>) -> Option<String> {
    non_blank(explicit).filter(|address| address != WILDCARD_ADDRESS).or_else(|| {
        let from = from_address.trim();
        (from != WILDCARD_ADDRESS).then(|| from.to_string())
    })
}

pub(crate) fn qualified_identity_name(name: &str) -> String {
    let name = name.trim();
    if name.ends_with(IDENTITY_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{IDENTITY_SUFFIX}")
    }
}

fn currency_amount(side: &str, intent: Option<&ResolvedAssetIntent>, manual: Option<&ManualAsset>) -> Result<(String, f64)> {
    if let Some(manual) = manual {
        if manual.currency.trim().is_empty() {
            return Err(DeskError::missing_field(format!("{side} currency")));
        }
        if !manual.amount.is_finite() || manual.amount <= 0.0 {
            return Err(DeskError::invalid_field(format!("{side} amount"), "must be a positive number"));
        }
        return Ok((manual.currency.trim().to_string(), manual.amount));
    }
    match intent {
        Some(ResolvedAssetIntent::Currency { currency, amount: Some(amount) }) => Ok((currency.clone(), *amount)),
        Some(ResolvedAssetIntent::Currency { .. }) => Err(DeskError::invalid_field(format!("{side} amount"), "offer amount is not numeric")),
        _ => Err(DeskError::UnresolvedAsset { side: side.to_string() }),
    }
}

fn compose_deliver(input: &TakeOfferInput) -> Result<Value> {
    if input.manual_deliver.is_none() {
        if let Some(ResolvedAssetIntent::Identity { .. }) = &input.deliver {
            return Err(DeskError::UnsupportedAsset { details: "delivering identities is not supported".to_string() });
        }
    }
    let (currency, amount) = currency_amount("deliver", input.deliver.as_ref(), input.manual_deliver.as_ref())?;
    Ok(json!({"currency": currency, "amount": amount}))
}

fn compose_identity_accept(input: &TakeOfferInput, identity_name: &str) -> Result<Value> {
    let details = input.identity_details.clone().unwrap_or_default();
    let primary_addresses = match non_blank(input.new_primary_address.as_deref()) {
        Some(address) => vec![address],
        None if !details.primary_addresses.is_empty() => details.primary_addresses.clone(),
        None => return Err(DeskError::missing_field("new primary address (the identity has none)")),
    };
    let minimum_signatures = input.minimum_signatures.unwrap_or(details.minimum_signatures).max(MIN_IDENTITY_SIGNATURES);

    let mut accept = Map::new();
    accept.insert("name".to_string(), Value::String(qualified_identity_name(identity_name)));
    if let Some(parent) = details.parent {
        accept.insert("parent".to_string(), Value::String(parent));
    }
    accept.insert("primaryaddresses".to_string(), json!(primary_addresses));
    accept.insert("minimumsignatures".to_string(), json!(minimum_signatures));
    for (key, value) in [
        ("revocationauthority", &input.revocation_authority),
        ("recoveryauthority", &input.recovery_authority),
        ("privateaddress", &input.private_address),
    ] {
        if let Some(value) = non_blank(value.as_deref()) {
            accept.insert(key.to_string(), Value::String(value));
        }
    }
    Ok(Value::Object(accept))
}

fn compose_accept(input: &TakeOfferInput) -> Result<Value> {
    if input.manual_accept.is_none() {
        if let Some(ResolvedAssetIntent::Identity { identity_name, .. }) = &input.accept {
            return compose_identity_accept(input, identity_name);
        }
    }
    let (currency, amount) = currency_amount("accept", input.accept.as_ref(), input.manual_accept.as_ref())?;
    let address = non_blank(input.accept_address.as_deref()).ok_or_else(|| DeskError::missing_field("accept address"))?;
    Ok(json!({"currency": currency, "amount": amount, "address": address}))
}

/// Build a `takeoffer` request, refusing locally when any gate fails.
pub fn compose_take_offer(input: &TakeOfferInput) -> Result<TakeOfferRequest> {
    let from_address = non_blank(Some(input.from_address.as_str())).ok_or_else(|| DeskError::missing_field("from address"))?;
    if input.offer_txid.trim().is_empty() {
        return Err(DeskError::missing_field("offer txid"));
    }
    if let Some(fee) = input.fee_amount {
        if !fee.is_finite() || fee < 0.0 {
            return Err(DeskError::invalid_field("fee", "must be a non-negative number"));
        }
    }
    let deliver = compose_deliver(input)?;
    let accept = compose_accept(input)?;

    let mut offerdata = Map::new();
    offerdata.insert("txid".to_string(), Value::String(input.offer_txid.to_string()));
    offerdata.insert("deliver".to_string(), deliver);
    offerdata.insert("accept".to_string(), accept);
    if let Some(change) = resolve_change_address(&from_address, input.change_address.as_deref()) {
        offerdata.insert("changeaddress".to_string(), Value::String(change));
    }
    Ok(TakeOfferRequest {
        from_address,
        offerdata: Value::Object(offerdata),
        return_tx_only: input.return_tx_only,
        fee_amount: input.fee_amount,
    })
}
