use crate::cli::{MakeArgs, OffersCommand, TakeArgs};
use crate::setup::{parse_amount, print_json, split_pair};
use log::{info, warn};
use serde_json::{json, Value};
use verusdesk_core::application::{Desk, OfferSelection};
use verusdesk_core::domain::offer::{ManualAsset, MakeOfferInput, OfferAsset, OfferRecord, WantedAsset};
use verusdesk_core::foundation::{DeskError, Result, TransactionId};

fn manual_asset(raw: &str, what: &str) -> Result<ManualAsset> {
    let (currency, amount) = split_pair(raw, what)?;
    Ok(ManualAsset { currency: currency.to_string(), amount: parse_amount(amount, what)? })
}

fn summary(selection: &OfferSelection) -> Value {
    json!({
        "txid": selection.offer.txid,
        "block_expiry": selection.offer.block_expiry,
        "you_deliver": selection.deliver_label,
        "you_receive": selection.accept_label,
        "deliver": selection.deliver,
        "accept": selection.accept,
    })
}

async fn find_offer(desk: &Desk, target: &str, identity: bool, txid: &str) -> Result<OfferRecord> {
    desk.offers
        .get_offers(target, !identity)
        .await?
        .into_iter()
        .find(|offer| offer.txid.as_str() == txid)
        .ok_or_else(|| DeskError::invalid_field("txid", format!("no offer {txid} listed for {target}")))
}

async fn select(desk: &Desk, offer: OfferRecord) -> Result<OfferSelection> {
    let txid = offer.txid.clone();
    desk.offers.select_offer(offer).await?.ok_or_else(|| DeskError::Message(format!("selection of offer {txid} was superseded")))
}

pub async fn offers(desk: &Desk, command: &OffersCommand) -> Result<()> {
    match command {
        OffersCommand::List { target, identity } => {
            let offers = desk.offers.get_offers(target, !identity).await?;
            print_json(&serde_json::to_value(offers)?)
        }
        OffersCommand::Open => {
            let offers = desk.offers.list_open_offers().await?;
            print_json(&serde_json::to_value(offers)?)
        }
        OffersCommand::Show { target, txid, identity } => {
            let offer = find_offer(desk, target, *identity, txid).await?;
            let selection = select(desk, offer).await?;
            print_json(&summary(&selection))
        }
    }
}

pub async fn take(desk: &Desk, args: &TakeArgs) -> Result<()> {
    let offer = find_offer(desk, &args.target, args.identity_listing, &args.txid).await?;
    let selection = select(desk, offer).await?;
    info!("taking offer txid={} deliver={} receive={}", selection.offer.txid, selection.deliver_label, selection.accept_label);

    let mut input = selection.take_input(args.from.clone());
    input.manual_deliver = args.deliver.as_deref().map(|raw| manual_asset(raw, "deliver")).transpose()?;
    input.manual_accept = args.accept.as_deref().map(|raw| manual_asset(raw, "accept")).transpose()?;
    input.change_address = args.change_address.clone();
    input.accept_address = args.accept_address.clone();
    input.new_primary_address = args.primary_address.clone();
    input.minimum_signatures = args.minimum_signatures;
    input.revocation_authority = args.revocation_authority.clone();
    input.recovery_authority = args.recovery_authority.clone();
    input.private_address = args.private_address.clone();
    input.return_tx_only = args.return_tx;
    input.fee_amount = args.fee;

    let result = desk.offers.take_offer(input).await?;
    print_json(&json!({"result": result, "return_tx_only": args.return_tx}))
}

fn offered_asset(args: &MakeArgs) -> Result<OfferAsset> {
    match (&args.offer_currency, &args.offer_identity) {
        (Some(raw), _) => {
            let (currency, amount) = split_pair(raw, "offer-currency")?;
            Ok(OfferAsset::Currency { currency: currency.to_string(), amount: parse_amount(amount, "offer-currency")? })
        }
        (None, Some(identity)) => Ok(OfferAsset::Identity { identity: identity.clone() }),
        (None, None) => Err(DeskError::missing_field("offer-currency or offer-identity")),
    }
}

fn wanted_asset(args: &MakeArgs) -> Result<WantedAsset> {
    match (&args.want_currency, &args.want_identity) {
        (Some(raw), _) => {
            let (currency, amount) = split_pair(raw, "want-currency")?;
            Ok(WantedAsset::Currency {
                currency: currency.to_string(),
                amount: parse_amount(amount, "want-currency")?,
                address: args.want_address.clone().unwrap_or_default(),
            })
        }
        (None, Some(name)) => Ok(WantedAsset::Identity {
            name: name.clone(),
            parent: args.want_parent.clone(),
            primary_addresses: args.want_primary_addresses.clone(),
            minimum_signatures: args.want_minimum_signatures,
        }),
        (None, None) => Err(DeskError::missing_field("want-currency or want-identity")),
    }
}

pub async fn make(desk: &Desk, args: &MakeArgs) -> Result<()> {
    let input = MakeOfferInput {
        from_address: args.from.clone(),
        change_address: args.change_address.clone(),
        expiry_height: args.expiry_height,
        offer: offered_asset(args)?,
        wanted: wanted_asset(args)?,
        return_tx_only: args.return_tx,
        fee_amount: args.fee,
    };
    let outcome = desk.offers.make_offer(input).await?;
    if outcome.txid.is_none() && !args.return_tx {
        warn!("makeoffer returned no txid");
    }
    print_json(&serde_json::to_value(outcome)?)
}

pub async fn close(desk: &Desk, txids: &[String]) -> Result<()> {
    let txids: Vec<TransactionId> = txids.iter().map(|txid| TransactionId::from(txid.as_str())).collect();
    let acknowledgement = desk.offers.close_offers(&txids).await?;
    print_json(&acknowledgement)
}
