use crate::fixtures::{
    alice_identity, btc_currency, currency_swap_entry, desk_with, grouped_listing, identity_sale_entry, ScriptedRpc, TEST_BTC_CURRENCY_ID,
    TEST_OFFER_TXID, TEST_R_ADDRESS, TEST_TAKE_TXID,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use verusdesk_core::domain::offer::{
    decode_offers, MakeOfferInput, ManualAsset, OfferAsset, OfferRecord, ResolvedAssetIntent, TakeOfferInput, WantedAsset,
};
use verusdesk_core::foundation::{DeskError, ErrorKind, TransactionId};

fn swap_offer() -> OfferRecord {
    decode_offers(&json!([currency_swap_entry(TEST_OFFER_TXID)])).remove(0)
}

#[tokio::test]
async fn listing_is_flattened_and_decoded() {
    let rpc = Arc::new(ScriptedRpc::new().respond("getoffers", grouped_listing()));
    let (desk, _store) = desk_with(&rpc);

    let offers = desk.offers.get_offers("VRSC", true).await.expect("offers");
    assert_eq!(offers.len(), 2);
    assert_eq!(rpc.calls_to("getoffers"), vec![vec![json!("VRSC"), json!(true), json!(false)]]);
}

#[tokio::test]
async fn empty_listings_yield_no_offers() {
    let rpc = Arc::new(ScriptedRpc::new().respond("getoffers", json!({})).respond("listopenoffers", json!(null)));
    let (desk, _store) = desk_with(&rpc);
    assert!(desk.offers.get_offers("VRSC", true).await.expect("offers").is_empty());
    assert!(desk.offers.list_open_offers().await.expect("open offers").is_empty());
    assert_eq!(rpc.calls_to("listopenoffers"), vec![vec![json!(true), json!(false)]]);
}

#[tokio::test]
async fn selection_resolves_both_sides_with_labels() {
    let rpc = Arc::new(ScriptedRpc::new().respond("getcurrency", btc_currency()));
    let (desk, _store) = desk_with(&rpc);

    let selection = desk.offers.select_offer(swap_offer()).await.expect("select").expect("current");
    assert_eq!(selection.deliver, ResolvedAssetIntent::Currency { currency: "VRSC".to_string(), amount: Some(10.0) });
    assert_eq!(selection.accept, ResolvedAssetIntent::Currency { currency: TEST_BTC_CURRENCY_ID.to_string(), amount: Some(0.5) });
    assert_eq!(selection.accept_label, "0.5 tBTC.vETH");
    assert_eq!(desk.offers.selection().current().as_deref(), Some(TEST_OFFER_TXID));
}

#[tokio::test]
async fn take_with_wildcard_source_omits_change_and_records_the_trade() {
    let rpc = Arc::new(ScriptedRpc::new().respond("getcurrency", btc_currency()).respond("takeoffer", json!({"txid": TEST_TAKE_TXID})));
    let (desk, _store) = desk_with(&rpc);

    let selection = desk.offers.select_offer(swap_offer()).await.expect("select").expect("current");
    let mut input = selection.take_input("*");
    input.change_address = Some("   ".to_string());
    input.accept_address = Some(TEST_R_ADDRESS.to_string());

    let txid = desk.offers.take_offer(input).await.expect("take");
    assert_eq!(txid, TEST_TAKE_TXID);

    let params = &rpc.calls_to("takeoffer")[0];
    assert_eq!(params.len(), 2);
    assert_eq!(params[0], json!("*"));
    let offerdata = &params[1];
    assert!(offerdata.get("changeaddress").is_none());
    assert_eq!(offerdata["txid"], json!(TEST_OFFER_TXID));
    assert_eq!(offerdata["deliver"], json!({"currency": "VRSC", "amount": 10.0}));
    assert_eq!(offerdata["accept"], json!({"currency": TEST_BTC_CURRENCY_ID, "amount": 0.5, "address": TEST_R_ADDRESS}));

    assert_eq!(desk.trades.txids(), vec![TransactionId::from(TEST_TAKE_TXID)]);
    assert!(desk.offers.selection().current().is_none());
}

#[tokio::test]
async fn identity_accept_uses_on_chain_details() {
    let rpc = Arc::new(ScriptedRpc::new().respond("getidentity", alice_identity()).respond("takeoffer", json!(TEST_TAKE_TXID)));
    let (desk, _store) = desk_with(&rpc);
    let offer = decode_offers(&json!([identity_sale_entry("idsale")])).remove(0);

    let selection = desk.offers.select_offer(offer).await.expect("select").expect("current");
    assert_eq!(selection.accept_label, "alice@");
    let mut input = selection.take_input(TEST_R_ADDRESS);
    input.minimum_signatures = Some(0);
    input.fee_amount = Some(0.0001);

    desk.offers.take_offer(input).await.expect("take");
    let params = &rpc.calls_to("takeoffer")[0];
    assert_eq!(params.len(), 4);
    assert_eq!(params[2], json!(false));
    let accept = &params[1]["accept"];
    assert_eq!(accept["name"], json!("alice@"));
    assert_eq!(accept["primaryaddresses"], json!(["RAliceOldPrimary"]));
    assert_eq!(accept["minimumsignatures"], json!(1));
    assert_eq!(params[1]["changeaddress"], json!(TEST_R_ADDRESS));
}

#[tokio::test]
async fn identity_deliver_is_refused_before_any_rpc() {
    let rpc = Arc::new(ScriptedRpc::new());
    let (desk, _store) = desk_with(&rpc);
    let input = TakeOfferInput {
        offer_txid: TransactionId::from(TEST_OFFER_TXID),
        deliver: Some(ResolvedAssetIntent::Identity { identity_name: "bob".to_string(), identity_id: "iBob".to_string() }),
        accept: Some(ResolvedAssetIntent::Currency { currency: "VRSC".to_string(), amount: Some(1.0) }),
        from_address: TEST_R_ADDRESS.to_string(),
        accept_address: Some(TEST_R_ADDRESS.to_string()),
        ..Default::default()
    };

    let err = desk.offers.take_offer(input).await.expect_err("identity deliver");
    assert!(matches!(err, DeskError::UnsupportedAsset { .. }));
    assert!(err.to_string().contains("delivering identities is not supported"));
    assert!(rpc.calls().is_empty());
    assert!(desk.trades.txids().is_empty());
}

#[tokio::test]
async fn unresolved_side_accepts_manual_entry() {
    let rpc = Arc::new(ScriptedRpc::new().respond("takeoffer", json!(TEST_TAKE_TXID)));
    let (desk, _store) = desk_with(&rpc);
    let mut input = TakeOfferInput {
        offer_txid: TransactionId::from(TEST_OFFER_TXID),
        deliver: Some(ResolvedAssetIntent::Unknown),
        accept: Some(ResolvedAssetIntent::Currency { currency: "VRSC".to_string(), amount: Some(1.0) }),
        from_address: TEST_R_ADDRESS.to_string(),
        accept_address: Some(TEST_R_ADDRESS.to_string()),
        ..Default::default()
    };

    let err = desk.offers.take_offer(input.clone()).await.expect_err("unknown deliver");
    assert!(matches!(err, DeskError::UnresolvedAsset { .. }));

    input.manual_deliver = Some(ManualAsset { currency: "tBTC".to_string(), amount: 0.25 });
    desk.offers.take_offer(input).await.expect("manual deliver");
    assert_eq!(rpc.calls_to("takeoffer")[0][1]["deliver"], json!({"currency": "tBTC", "amount": 0.25}));
}

#[tokio::test]
async fn returned_and_thrown_daemon_errors_read_the_same() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .respond_once("takeoffer", json!({"error": "offer no longer available"}))
            .fail("getcurrency", "offer no longer available"),
    );
    let (desk, _store) = desk_with(&rpc);
    let mut input = swap_input();
    input.from_address = TEST_R_ADDRESS.to_string();

    let returned = desk.offers.take_offer(input).await.expect_err("returned error");
    let thrown = desk.daemon.get_currency("x").await.expect_err("thrown error");
    assert_eq!(returned.kind(), ErrorKind::Daemon);
    assert_eq!(thrown.kind(), ErrorKind::Daemon);
    assert_eq!(returned.user_message(), thrown.user_message());
    assert!(desk.trades.txids().is_empty());
}

fn swap_input() -> TakeOfferInput {
    TakeOfferInput {
        offer_txid: TransactionId::from(TEST_OFFER_TXID),
        deliver: Some(ResolvedAssetIntent::Currency { currency: "VRSC".to_string(), amount: Some(10.0) }),
        accept: Some(ResolvedAssetIntent::Currency { currency: "tBTC".to_string(), amount: Some(0.5) }),
        accept_address: Some(TEST_R_ADDRESS.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn missing_source_address_is_a_validation_error() {
    let rpc = Arc::new(ScriptedRpc::new());
    let (desk, _store) = desk_with(&rpc);
    let err = desk.offers.take_offer(swap_input()).await.expect_err("no source");
    assert!(err.is_validation());
    assert!(rpc.calls().is_empty());
}

#[tokio::test]
async fn superseded_selection_is_discarded() {
    let rpc = Arc::new(ScriptedRpc::new().with_delay(Duration::from_millis(20)).respond("getcurrency", btc_currency()));
    let (desk, _store) = desk_with(&rpc);
    let first = swap_offer();
    let mut second = swap_offer();
    second.txid = TransactionId::from("second");

    let (first, second) = tokio::join!(desk.offers.select_offer(first), desk.offers.select_offer(second));
    assert!(first.expect("first select").is_none());
    assert_eq!(second.expect("second select").expect("current").offer.txid.as_str(), "second");
    // One lookup per identifier; the second selection joins the first one's requests.
    assert_eq!(rpc.call_count("getcurrency"), 2);
}

#[tokio::test]
async fn make_offer_records_the_txid() {
    let rpc = Arc::new(ScriptedRpc::new().respond("makeoffer", json!({"txid": "made1", "hex": "00ff"})));
    let (desk, _store) = desk_with(&rpc);
    let input = MakeOfferInput {
        from_address: "*".to_string(),
        change_address: None,
        expiry_height: Some(9000),
        offer: OfferAsset::Currency { currency: "VRSC".to_string(), amount: 10.0 },
        wanted: WantedAsset::Currency { currency: "tBTC".to_string(), amount: 0.01, address: TEST_R_ADDRESS.to_string() },
        return_tx_only: false,
        fee_amount: None,
    };

    let outcome = desk.offers.make_offer(input).await.expect("make");
    assert_eq!(outcome.txid.as_deref(), Some("made1"));
    let params = &rpc.calls_to("makeoffer")[0];
    assert_eq!(params[2], json!(false));
    assert!(params[1].get("changeaddress").is_none());
    assert_eq!(params[1]["expiryheight"], json!(9000));
    assert_eq!(desk.trades.txids(), vec![TransactionId::from("made1")]);
}

#[tokio::test]
async fn close_offers_refuses_an_empty_list() {
    let rpc = Arc::new(ScriptedRpc::new().respond("closeoffers", json!(null)));
    let (desk, _store) = desk_with(&rpc);
    assert!(desk.offers.close_offers(&[]).await.expect_err("empty").is_validation());
    desk.offers.close_offers(&[TransactionId::from("a"), TransactionId::from("b")]).await.expect("close");
    assert_eq!(rpc.calls_to("closeoffers"), vec![vec![json!(["a", "b"])]]);
}
