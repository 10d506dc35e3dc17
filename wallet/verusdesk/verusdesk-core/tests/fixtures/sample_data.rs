#![allow(dead_code)]

use crate::fixtures::{ScriptedRpc, TEST_BTC_CURRENCY_ID, TEST_IDENTITY_ID, TEST_OFFER_TXID};
use serde_json::{json, Value};
use std::sync::Arc;
use verusdesk_core::application::Desk;
use verusdesk_core::infrastructure::config::AppConfig;
use verusdesk_core::infrastructure::storage::MemoryKvStore;

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.ephemeral = true;
    config.storage.persist_debounce_ms = 10;
    config.node.chain = "vrsctest".to_string();
    config
}

pub fn desk_with(rpc: &Arc<ScriptedRpc>) -> (Desk, Arc<MemoryKvStore>) {
    let store = Arc::new(MemoryKvStore::new());
    let desk = Desk::new(&test_config(), rpc.clone(), store.clone());
    (desk, store)
}

/// One `getoffers` entry: the maker gives 0.5 BTC-on-Verus and wants 10 VRSC.
pub fn currency_swap_entry(txid: &str) -> Value {
    json!({
        "offer": {
            "txid": txid,
            "blockexpiry": 5000,
            "offer": {TEST_BTC_CURRENCY_ID: 0.5},
            "accept": {"currency": "VRSC", "amount": 10},
        }
    })
}

/// One `getoffers` entry: the maker gives an identity and wants 25 VRSC.
pub fn identity_sale_entry(txid: &str) -> Value {
    json!({
        "offer": {
            "txid": txid,
            "blockexpiry": 6000,
            "offer": {"name": "alice", "identityid": TEST_IDENTITY_ID},
            "accept": {"currency": "VRSC", "amount": 25},
        }
    })
}

/// `getoffers` output grouped by listing category.
pub fn grouped_listing() -> Value {
    json!({
        "currency_offers_for_VRSC": [currency_swap_entry(TEST_OFFER_TXID)],
        "identity_offers_for_VRSC": [identity_sale_entry("b0b0")],
    })
}

pub fn btc_currency() -> Value {
    json!({"name": "tBTC", "currencyid": TEST_BTC_CURRENCY_ID, "fullyqualifiedname": "tBTC.vETH"})
}

pub fn alice_identity() -> Value {
    json!({
        "identity": {
            "name": "alice",
            "identityaddress": TEST_IDENTITY_ID,
            "parent": "iJhCezBExJHvtyH3fGhNnt2NhU4Ztkf2yq",
            "primaryaddresses": ["RAliceOldPrimary"],
            "minimumsignatures": 1,
            "revocationauthority": TEST_IDENTITY_ID,
            "recoveryauthority": TEST_IDENTITY_ID,
        }
    })
}
