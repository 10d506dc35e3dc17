use crate::application::metadata::CurrencyMetadataCache;
use crate::application::selection::{SelectionTicket, SelectionTracker};
use crate::application::trades::TradeHistoryStore;
use crate::domain::offer::{
    classify, compose_make_offer, compose_take_offer, decode_offers, IdentityAcceptDetails, MakeOfferInput, MakeOfferOutcome, OfferRecord,
    ResolvedAssetIntent, TakeOfferInput,
};
use crate::foundation::{Result, TransactionId};
use crate::infrastructure::config::OffersConfig;
use crate::infrastructure::rpc::DaemonClient;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A selected offer with both sides resolved for the local user.
#[derive(Clone, Debug, Serialize)]
pub struct OfferSelection {
    pub offer: OfferRecord,
    /// From the offer's `accept` fragment.
    pub deliver: ResolvedAssetIntent,
    /// From the offer's `offer` fragment.
    pub accept: ResolvedAssetIntent,
    pub deliver_label: String,
    pub accept_label: String,
    pub identity_details: Option<IdentityAcceptDetails>,
    #[serde(skip)]
    ticket: SelectionTicket,
}

impl OfferSelection {
    pub fn ticket(&self) -> &SelectionTicket {
        &self.ticket
    }

    /// A take-offer form pre-filled from this selection.
    pub fn take_input(&self, from_address: impl Into<String>) -> TakeOfferInput {
        TakeOfferInput {
            offer_txid: self.offer.txid.clone(),
            deliver: Some(self.deliver.clone()),
            accept: Some(self.accept.clone()),
            from_address: from_address.into(),
            identity_details: self.identity_details.clone(),
            ..Default::default()
        }
    }
}

/// Offer listing, selection and the make/take/close flows against one daemon.
pub struct OfferDesk {
    daemon: DaemonClient,
    metadata: Arc<CurrencyMetadataCache>,
    trades: Arc<TradeHistoryStore>,
    selection: SelectionTracker,
    config: OffersConfig,
}

impl OfferDesk {
    pub fn new(daemon: DaemonClient, metadata: Arc<CurrencyMetadataCache>, trades: Arc<TradeHistoryStore>, config: OffersConfig) -> Self {
        Self { daemon, metadata, trades, selection: SelectionTracker::new(), config }
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn metadata(&self) -> &CurrencyMetadataCache {
        &self.metadata
    }

    /// Offers for a currency (or for an identity when `is_currency` is false).
    pub async fn get_offers(&self, currency_or_id: &str, is_currency: bool) -> Result<Vec<OfferRecord>> {
        let raw = self.daemon.get_offers(currency_or_id, is_currency, false).await?;
        let offers = decode_offers(&raw);
        debug!("listed offers target={} count={}", currency_or_id, offers.len());
        Ok(offers)
    }

    /// The wallet's own open offers.
    pub async fn list_open_offers(&self) -> Result<Vec<OfferRecord>> {
        let raw = self.daemon.list_open_offers(true, self.config.include_expired).await?;
        Ok(decode_offers(&raw))
    }

    /// Make `offer` the current selection and resolve both sides.
    ///
    /// Returns `None` when another selection (or a reset) happened while the lookups ran.
    pub async fn select_offer(&self, offer: OfferRecord) -> Result<Option<OfferSelection>> {
        let ticket = self.selection.select(offer.txid.clone());
        let deliver = classify(&offer.accept);
        let accept = classify(&offer.offer);
        if deliver.is_unknown() || accept.is_unknown() {
            info!("offer needs manual entry txid={} deliver_known={} accept_known={}", offer.txid, !deliver.is_unknown(), !accept.is_unknown());
        }

        let deliver_label = self.metadata.label(&deliver).await;
        let accept_label = self.metadata.label(&accept).await;
        let identity_details = match &accept {
            ResolvedAssetIntent::Identity { identity_name, identity_id } => {
                let lookup = if identity_id.trim().is_empty() { identity_name } else { identity_id };
                match self.daemon.get_identity(lookup).await {
                    Ok(response) => Some(IdentityAcceptDetails::from_getidentity(&response)),
                    Err(err) => {
                        warn!("identity lookup failed identity={} error={}", lookup, err);
                        None
                    }
                }
            }
            _ => None,
        };

        if !self.selection.is_current(&ticket) {
            debug!("discarding superseded selection txid={}", offer.txid);
            return Ok(None);
        }
        Ok(Some(OfferSelection { offer, deliver, accept, deliver_label, accept_label, identity_details, ticket }))
    }

    /// Compose and submit a take-offer. On success the result is recorded in trade history and the
    /// selection is cleared.
    pub async fn take_offer(&self, mut input: TakeOfferInput) -> Result<String> {
        if input.fee_amount.is_none() {
            input.fee_amount = self.config.default_fee;
        }
        let request = compose_take_offer(&input)?;
        let result = self.daemon.take_offer(&request).await?;
        info!("took offer offer_txid={} return_tx_only={}", input.offer_txid, input.return_tx_only);
        self.trades.add(result.clone());
        self.selection.reset();
        Ok(result)
    }

    pub async fn make_offer(&self, mut input: MakeOfferInput) -> Result<MakeOfferOutcome> {
        if input.fee_amount.is_none() {
            input.fee_amount = self.config.default_fee;
        }
        let request = compose_make_offer(&input)?;
        let outcome = self.daemon.make_offer(&request).await?;
        if let Some(txid) = &outcome.txid {
            info!("made offer txid={}", txid);
            self.trades.add(txid.clone());
        }
        Ok(outcome)
    }

    pub async fn close_offers(&self, txids: &[TransactionId]) -> Result<Value> {
        let acknowledgement = self.daemon.close_offers(txids).await?;
        info!("closed offers count={}", txids.len());
        Ok(acknowledgement)
    }
}
