use crate::fixtures::{grouped_listing, TEST_BTC_CURRENCY_ID, TEST_IDENTITY_ID, TEST_OFFER_TXID};
use serde_json::json;
use verusdesk_core::domain::offer::{classify, decode_offers, flatten, ResolvedAssetIntent};

#[test]
fn flatten_accepts_every_listing_shape() {
    assert!(flatten(&json!({})).is_empty());
    assert!(flatten(&json!(null)).is_empty());
    assert_eq!(flatten(&json!([{"a": 1}])), vec![json!({"a": 1})]);

    let grouped = json!({"x": [{"txid": "A"}], "y": [{"txid": "B"}]});
    let flat = flatten(&grouped);
    assert_eq!(flat.len(), 2);
    assert!(flat.contains(&json!({"txid": "A"})));
    assert!(flat.contains(&json!({"txid": "B"})));
}

#[test]
fn decoded_listing_keeps_fragments_untyped() {
    let offers = decode_offers(&grouped_listing());
    assert_eq!(offers.len(), 2);
    let swap = offers.iter().find(|offer| offer.txid.as_str() == TEST_OFFER_TXID).expect("swap offer");
    assert_eq!(swap.block_expiry, Some(5000));
    assert_eq!(swap.offer, json!({TEST_BTC_CURRENCY_ID: 0.5}));
    assert!(swap.is_expired_at(5000));
    assert!(!swap.is_expired_at(4999));
}

#[test]
fn classify_examples() {
    assert_eq!(
        classify(&json!({"name": "alice", "identityid": TEST_IDENTITY_ID})),
        ResolvedAssetIntent::Identity { identity_name: "alice".to_string(), identity_id: TEST_IDENTITY_ID.to_string() }
    );
    assert_eq!(
        classify(&json!({"currency": "VRSC", "amount": 10})),
        ResolvedAssetIntent::Currency { currency: "VRSC".to_string(), amount: Some(10.0) }
    );
    assert_eq!(
        classify(&json!({TEST_BTC_CURRENCY_ID: 0.5})),
        ResolvedAssetIntent::Currency { currency: TEST_BTC_CURRENCY_ID.to_string(), amount: Some(0.5) }
    );
    assert!(classify(&json!({})).is_unknown());
    assert!(classify(&json!({"nested": {"a": 1}})).is_unknown());
    assert!(classify(&json!("VRSC")).is_unknown());
}

#[test]
fn classify_skips_bookkeeping_keys() {
    let intent = classify(&json!({"txid": "abc", "blockexpiry": 100, "VRSC": 3}));
    assert_eq!(intent.currency_id(), Some("VRSC"));
}
