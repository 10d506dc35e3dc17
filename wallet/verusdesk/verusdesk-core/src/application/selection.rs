use crate::foundation::util::sync::lock_or_recover;
use crate::foundation::TransactionId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Proof that a selection was current when asynchronous work for it started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
    offer_txid: TransactionId,
}

impl SelectionTicket {
    pub fn offer_txid(&self) -> &TransactionId {
        &self.offer_txid
    }
}

/// Tracks which offer is being composed. Results for a superseded selection are discarded by
/// checking their ticket before applying them.
#[derive(Default)]
pub struct SelectionTracker {
    generation: AtomicU64,
    current: Mutex<Option<SelectionTicket>>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, offer_txid: impl Into<TransactionId>) -> SelectionTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = SelectionTicket { generation, offer_txid: offer_txid.into() };
        *lock_or_recover(&self.current) = Some(ticket.clone());
        ticket
    }

    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        lock_or_recover(&self.current).as_ref() == Some(ticket)
    }

    pub fn current(&self) -> Option<TransactionId> {
        lock_or_recover(&self.current).as_ref().map(|ticket| ticket.offer_txid.clone())
    }

    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *lock_or_recover(&self.current) = None;
    }
}
