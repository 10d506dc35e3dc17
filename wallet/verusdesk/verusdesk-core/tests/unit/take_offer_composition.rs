use serde_json::json;
use verusdesk_core::domain::offer::{compose_take_offer, ResolvedAssetIntent, TakeOfferInput};
use verusdesk_core::foundation::TransactionId;

fn swap(from: &str, change: Option<String>) -> TakeOfferInput {
    TakeOfferInput {
        offer_txid: TransactionId::from("offer"),
        deliver: Some(ResolvedAssetIntent::Currency { currency: "VRSC".to_string(), amount: Some(10.0) }),
        accept: Some(ResolvedAssetIntent::Currency { currency: "tBTC".to_string(), amount: Some(0.5) }),
        from_address: from.to_string(),
        change_address: change,
        accept_address: Some("RDest".to_string()),
        ..Default::default()
    }
}

#[test]
fn wildcard_source_with_blank_change_omits_the_key() {
    let request = compose_take_offer(&swap("*", Some(String::new()))).expect("request");
    assert!(request.offerdata.get("changeaddress").is_none());
    assert_eq!(request.to_params(), vec![json!("*"), request.offerdata.clone()]);
}

#[test]
fn change_address_is_never_the_wildcard() {
    let sources = ["*", " * ", "RSource1"];
    let changes = [None, Some("*"), Some(""), Some("  "), Some("RChange1")];
    for from in sources {
        for change in changes {
            let request = compose_take_offer(&swap(from, change.map(str::to_string))).expect("request");
            assert_ne!(request.offerdata.get("changeaddress"), Some(&json!("*")), "from={from:?} change={change:?}");
        }
    }
}
