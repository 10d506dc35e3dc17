pub mod currency;
pub mod desk;
pub mod metadata;
pub mod offers;
pub mod selection;
pub mod staging;
pub mod trades;

pub use currency::define_currency;
pub use desk::{open_store, Desk};
pub use metadata::{CurrencyMetadata, CurrencyMetadataCache};
pub use offers::{OfferDesk, OfferSelection};
pub use selection::{SelectionTicket, SelectionTracker};
pub use staging::StagingLedger;
pub use trades::TradeHistoryStore;
