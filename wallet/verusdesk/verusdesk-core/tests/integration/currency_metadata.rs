use crate::fixtures::{btc_currency, ScriptedRpc, TEST_BTC_CURRENCY_ID};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use verusdesk_core::application::CurrencyMetadataCache;
use verusdesk_core::domain::offer::ResolvedAssetIntent;
use verusdesk_core::infrastructure::rpc::DaemonClient;

#[tokio::test]
async fn successful_lookups_are_cached() {
    let rpc = Arc::new(ScriptedRpc::new().respond("getcurrency", btc_currency()));
    let cache = CurrencyMetadataCache::new(DaemonClient::new(rpc.clone()));

    assert_eq!(cache.display_name(TEST_BTC_CURRENCY_ID).await, "tBTC.vETH");
    assert_eq!(cache.display_name(TEST_BTC_CURRENCY_ID).await, "tBTC.vETH");
    assert_eq!(rpc.call_count("getcurrency"), 1);
    assert_eq!(cache.cached(TEST_BTC_CURRENCY_ID).expect("cached").name, "tBTC");
}

#[tokio::test]
async fn failed_lookup_falls_back_to_the_identifier_and_retries() {
    let rpc = Arc::new(ScriptedRpc::new().fail("getcurrency", "Invalid currency"));
    let cache = CurrencyMetadataCache::new(DaemonClient::new(rpc.clone()));

    assert_eq!(cache.display_name("iUnknown").await, "iUnknown");
    assert!(cache.cached("iUnknown").is_none());

    rpc.set_response("getcurrency", json!(null));
    assert_eq!(cache.display_name("iUnknown").await, "iUnknown");
    assert_eq!(rpc.call_count("getcurrency"), 2);
}

#[tokio::test]
async fn concurrent_lookups_are_coalesced() {
    let rpc = Arc::new(ScriptedRpc::new().with_delay(Duration::from_millis(20)).respond("getcurrency", btc_currency()));
    let cache = CurrencyMetadataCache::new(DaemonClient::new(rpc.clone()));

    let (a, b) = tokio::join!(cache.lookup(TEST_BTC_CURRENCY_ID), cache.lookup(TEST_BTC_CURRENCY_ID));
    assert_eq!(a, b);
    assert_eq!(rpc.call_count("getcurrency"), 1);
}

#[tokio::test]
async fn labels_for_each_intent_kind() {
    let rpc = Arc::new(ScriptedRpc::new().respond("getcurrency", btc_currency()));
    let cache = CurrencyMetadataCache::new(DaemonClient::new(rpc.clone()));

    let currency = ResolvedAssetIntent::Currency { currency: TEST_BTC_CURRENCY_ID.to_string(), amount: Some(1.5) };
    assert_eq!(cache.label(&currency).await, "1.5 tBTC.vETH");
    let identity = ResolvedAssetIntent::Identity { identity_name: "alice".to_string(), identity_id: "iAlice".to_string() };
    assert_eq!(cache.label(&identity).await, "alice@");
    assert_eq!(cache.label(&ResolvedAssetIntent::Unknown).await, "unrecognised");
}

#[tokio::test]
async fn late_awaiter_keeps_a_newer_lookup_in_flight() {
    let rpc = Arc::new(ScriptedRpc::new().with_delay(Duration::from_millis(20)).fail("getcurrency", "Invalid currency"));
    let cache = CurrencyMetadataCache::new(DaemonClient::new(rpc.clone()));

    let mut first = Box::pin(cache.lookup("iSlow"));
    let mut joined = Box::pin(cache.lookup("iSlow"));
    assert!(timeout(Duration::ZERO, &mut first).await.is_err());
    assert!(timeout(Duration::ZERO, &mut joined).await.is_err());
    assert_eq!(first.await, None);

    // Failures are not cached, so this starts a second request while `joined` has not resumed.
    let mut retry = Box::pin(cache.lookup("iSlow"));
    assert!(timeout(Duration::ZERO, &mut retry).await.is_err());
    assert_eq!(joined.await, None);

    let (retry, again) = tokio::join!(retry, cache.lookup("iSlow"));
    assert_eq!((retry, again), (None, None));
    assert_eq!(rpc.call_count("getcurrency"), 2);
}
