use crate::domain::offer::compose::{non_blank, qualified_identity_name, resolve_change_address};
use crate::foundation::{DeskError, Result, TransactionId, MIN_IDENTITY_SIGNATURES};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// What the maker puts up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OfferAsset {
    Currency { currency: String, amount: f64 },
    Identity { identity: String },
}

/// What the maker wants in return.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WantedAsset {
    Currency {
        currency: String,
        amount: f64,
        address: String,
    },
    Identity {
        name: String,
        parent: Option<String>,
        primary_addresses: Vec<String>,
        minimum_signatures: i64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MakeOfferInput {
    pub from_address: String,
    pub change_address: Option<String>,
    pub expiry_height: Option<u64>,
    pub offer: OfferAsset,
    pub wanted: WantedAsset,
    pub return_tx_only: bool,
    pub fee_amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MakeOfferRequest {
    pub from_address: String,
    pub offerdata: Value,
    pub return_tx_only: bool,
    pub fee_amount: Option<f64>,
}

impl MakeOfferRequest {
    pub fn to_params(&self) -> Vec<Value> {
        let mut params = vec![Value::String(self.from_address.clone()), self.offerdata.clone(), Value::Bool(self.return_tx_only)];
        if let Some(fee) = self.fee_amount {
            params.push(json!(fee));
        }
        params
    }
}

/// `makeoffer` result. `txid` is absent when only the raw transaction was requested.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MakeOfferOutcome {
    #[serde(default)]
    pub txid: Option<TransactionId>,
    #[serde(default)]
    pub hex: Option<String>,
    #[serde(default)]
    pub oprettxid: Option<TransactionId>,
}

fn check_amount(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DeskError::invalid_field(field, "must be a positive number"));
    }
    Ok(())
}

fn offer_fragment(offer: &OfferAsset) -> Result<Value> {
    match offer {
        OfferAsset::Currency { currency, amount } => {
            let currency = non_blank(Some(currency.as_str())).ok_or_else(|| DeskError::missing_field("offer currency"))?;
            check_amount("offer amount", *amount)?;
            Ok(json!({"currency": currency, "amount": amount}))
        }
        OfferAsset::Identity { identity } => {
            let identity = non_blank(Some(identity.as_str())).ok_or_else(|| DeskError::missing_field("offer identity"))?;
            Ok(json!({"identity": identity}))
        }
    }
}

fn wanted_fragment(wanted: &WantedAsset) -> Result<Value> {
    match wanted {
        WantedAsset::Currency { currency, amount, address } => {
            let currency = non_blank(Some(currency.as_str())).ok_or_else(|| DeskError::missing_field("wanted currency"))?;
            check_amount("wanted amount", *amount)?;
            let address = non_blank(Some(address.as_str())).ok_or_else(|| DeskError::missing_field("wanted address"))?;
            Ok(json!({"currency": currency, "amount": amount, "address": address}))
        }
        WantedAsset::Identity { name, parent, primary_addresses, minimum_signatures } => {
            let name = non_blank(Some(name.as_str())).ok_or_else(|| DeskError::missing_field("wanted identity name"))?;
            let primary_addresses: Vec<String> = primary_addresses.iter().filter_map(|a| non_blank(Some(a.as_str()))).collect();
            if primary_addresses.is_empty() {
                return Err(DeskError::missing_field("wanted identity primary address"));
            }
            let mut fragment = Map::new();
            fragment.insert("name".to_string(), Value::String(qualified_identity_name(&name)));
            if let Some(parent) = non_blank(parent.as_deref()) {
                fragment.insert("parent".to_string(), Value::String(parent));
            }
            fragment.insert("primaryaddresses".to_string(), json!(primary_addresses));
            fragment.insert("minimumsignatures".to_string(), json!((*minimum_signatures).max(MIN_IDENTITY_SIGNATURES)));
            Ok(Value::Object(fragment))
        }
    }
}

/// Build a `makeoffer` request with the same source/change address rules as take-offer.
pub fn compose_make_offer(input: &MakeOfferInput) -> Result<MakeOfferRequest> {
    let from_address = non_blank(Some(input.from_address.as_str())).ok_or_else(|| DeskError::missing_field("from address"))?;
    if let Some(fee) = input.fee_amount {
        if !fee.is_finite() || fee < 0.0 {
            return Err(DeskError::invalid_field("fee", "must be a non-negative number"));
        }
    }
    let mut offerdata = Map::new();
    if let Some(change) = resolve_change_address(&from_address, input.change_address.as_deref()) {
        offerdata.insert("changeaddress".to_string(), Value::String(change));
    }
    if let Some(expiry) = input.expiry_height {
        offerdata.insert("expiryheight".to_string(), json!(expiry));
    }
    offerdata.insert("offer".to_string(), offer_fragment(&input.offer)?);
    offerdata.insert("for".to_string(), wanted_fragment(&input.wanted)?);
    Ok(MakeOfferRequest {
        from_address,
        offerdata: Value::Object(offerdata),
        return_tx_only: input.return_tx_only,
        fee_amount: input.fee_amount,
    })
}
