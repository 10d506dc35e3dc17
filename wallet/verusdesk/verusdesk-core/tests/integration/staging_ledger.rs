use crate::fixtures::{desk_with, ScriptedRpc, TEST_DEFINE_HEX, TEST_DEFINE_TXID};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use verusdesk_core::application::StagingLedger;
use verusdesk_core::domain::currency::{CurrencyDefinitionDraft, CurrencyOption, OptionSelection};
use verusdesk_core::foundation::{DeskError, ErrorKind};
use verusdesk_core::infrastructure::rpc::DaemonClient;

fn token_draft() -> CurrencyDefinitionDraft {
    CurrencyDefinitionDraft::new("mytoken", &OptionSelection::new().with(CurrencyOption::Token)).with_preallocation("alice@", "100")
}

#[tokio::test]
async fn define_currency_stages_one_record() {
    let rpc = Arc::new(ScriptedRpc::new().respond("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": TEST_DEFINE_HEX})));
    let (desk, _store) = desk_with(&rpc);

    let staged = desk.define_currency(&token_draft()).await.expect("define");
    assert_eq!(staged.define_txid.as_str(), TEST_DEFINE_TXID);
    assert_eq!(staged.raw_hex, TEST_DEFINE_HEX);
    assert_eq!(desk.staging.len(), 1);

    let sent = &rpc.calls_to("definecurrency")[0][0];
    assert_eq!(sent["options"], json!(32));
    assert_eq!(sent["name"], json!("mytoken"));
    assert_eq!(sent["preallocations"], json!([{"alice@": 100}]));
}

#[tokio::test]
async fn duplicate_define_txid_keeps_the_original_hex() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .respond_once("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": TEST_DEFINE_HEX}))
            .respond_once("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": "cafebabe"})),
    );
    let (desk, _store) = desk_with(&rpc);

    desk.define_currency(&token_draft()).await.expect("first define");
    let second = desk.define_currency(&token_draft()).await.expect("second define");
    assert_eq!(second.raw_hex, TEST_DEFINE_HEX);
    assert_eq!(desk.staging.len(), 1);
    assert_eq!(desk.staging.list()[0].raw_hex, TEST_DEFINE_HEX);
}

#[tokio::test]
async fn blank_name_never_reaches_the_daemon() {
    let rpc = Arc::new(ScriptedRpc::new());
    let (desk, _store) = desk_with(&rpc);
    let draft = CurrencyDefinitionDraft::new("  ", &OptionSelection::new().with(CurrencyOption::Token));

    let err = desk.define_currency(&draft).await.expect_err("blank name");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(rpc.calls().is_empty());
}

#[tokio::test]
async fn newest_definition_is_listed_first() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .respond_once("definecurrency", json!({"tx": {"txid": "T1"}, "hex": "aa"}))
            .respond_once("definecurrency", json!({"tx": {"txid": "T2"}, "hex": "bb"})),
    );
    let (desk, _store) = desk_with(&rpc);
    desk.define_currency(&token_draft()).await.expect("first");
    desk.define_currency(&token_draft()).await.expect("second");

    let order: Vec<String> = desk.staging.list().iter().map(|record| record.define_txid.to_string()).collect();
    assert_eq!(order, vec!["T2", "T1"]);
}

#[tokio::test]
async fn broadcast_keeps_the_record_and_refuses_a_repeat() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .respond("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": TEST_DEFINE_HEX}))
            .respond("sendrawtransaction", json!("N1")),
    );
    let (desk, _store) = desk_with(&rpc);
    desk.define_currency(&token_draft()).await.expect("define");

    let txid = desk.staging.broadcast(TEST_DEFINE_TXID).await.expect("broadcast");
    assert_eq!(txid.as_str(), "N1");
    assert_eq!(rpc.calls_to("sendrawtransaction"), vec![vec![json!(TEST_DEFINE_HEX)]]);
    assert!(desk.staging.get(TEST_DEFINE_TXID).is_some());

    let err = desk.staging.broadcast(TEST_DEFINE_TXID).await.expect_err("repeat broadcast");
    assert!(matches!(err, DeskError::AlreadyBroadcast { .. }));
    assert_eq!(rpc.call_count("sendrawtransaction"), 1);

    assert!(desk.staging.remove(TEST_DEFINE_TXID));
    assert!(!desk.staging.remove(TEST_DEFINE_TXID));
    assert!(desk.staging.broadcast_txid(TEST_DEFINE_TXID).is_none());
}

#[tokio::test]
async fn overlapping_broadcasts_relay_once() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .with_delay(Duration::from_millis(20))
            .respond("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": TEST_DEFINE_HEX}))
            .respond("sendrawtransaction", json!("N1")),
    );
    let (desk, _store) = desk_with(&rpc);
    desk.define_currency(&token_draft()).await.expect("define");

    let (first, second) = tokio::join!(desk.staging.broadcast(TEST_DEFINE_TXID), desk.staging.broadcast(TEST_DEFINE_TXID));
    assert_eq!(first.expect("first relay").as_str(), "N1");
    let err = second.expect_err("overlapping relay");
    assert!(matches!(err, DeskError::BroadcastInFlight(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(rpc.call_count("sendrawtransaction"), 1);

    let err = desk.staging.broadcast(TEST_DEFINE_TXID).await.expect_err("already relayed");
    assert!(matches!(err, DeskError::AlreadyBroadcast { .. }));
    assert_eq!(desk.staging.broadcast_txid(TEST_DEFINE_TXID).expect("relayed").as_str(), "N1");
}

#[tokio::test]
async fn failed_broadcast_can_be_retried() {
    let rpc = Arc::new(
        ScriptedRpc::new()
            .respond("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": TEST_DEFINE_HEX}))
            .respond_once("sendrawtransaction", json!({"error": {"code": -26, "message": "bad-txns-inputs-spent"}}))
            .respond_once("sendrawtransaction", json!("N2")),
    );
    let (desk, _store) = desk_with(&rpc);
    desk.define_currency(&token_draft()).await.expect("define");

    let err = desk.staging.broadcast(TEST_DEFINE_TXID).await.expect_err("rejected");
    assert_eq!(err.user_message(), "bad-txns-inputs-spent");
    assert_eq!(desk.staging.broadcast(TEST_DEFINE_TXID).await.expect("retry").as_str(), "N2");
}

#[tokio::test]
async fn unknown_define_txid_is_refused_locally() {
    let rpc = Arc::new(ScriptedRpc::new());
    let (desk, _store) = desk_with(&rpc);
    let err = desk.staging.broadcast("missing").await.expect_err("not staged");
    assert!(matches!(err, DeskError::StagedNotFound(_)));
    assert!(rpc.calls().is_empty());
}

#[tokio::test]
async fn staged_list_survives_a_reload() {
    let rpc = Arc::new(ScriptedRpc::new().respond("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": TEST_DEFINE_HEX})));
    let (desk, store) = desk_with(&rpc);
    desk.define_currency(&token_draft()).await.expect("define");
    desk.flush().expect("flush");

    let reloaded = StagingLedger::load(store, DaemonClient::new(rpc.clone()), Duration::from_millis(10));
    let records = reloaded.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].currency_name(), Some("mytoken"));
    assert_eq!(records[0].raw_hex, TEST_DEFINE_HEX);
}

#[tokio::test]
async fn debounced_writer_persists_without_flush() {
    let rpc = Arc::new(ScriptedRpc::new().respond("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": TEST_DEFINE_HEX})));
    let (desk, store) = desk_with(&rpc);
    desk.define_currency(&token_draft()).await.expect("define");

    let mut updates = desk.staging.persisted().subscribe();
    assert_eq!(updates.borrow_and_update().items.len(), 1);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.write_count() >= 1);
}

#[tokio::test]
async fn unavailable_store_does_not_break_the_ledger() {
    let rpc = Arc::new(ScriptedRpc::new().respond("definecurrency", json!({"tx": {"txid": TEST_DEFINE_TXID}, "hex": TEST_DEFINE_HEX})));
    let (desk, store) = desk_with(&rpc);
    store.set_unavailable(true);

    desk.define_currency(&token_draft()).await.expect("define");
    assert_eq!(desk.staging.len(), 1);
    let err = desk.staging.flush().expect_err("store down");
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(desk.staging.persisted().persist_failures() >= 1);
}
