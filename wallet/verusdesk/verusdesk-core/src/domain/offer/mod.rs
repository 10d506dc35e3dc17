pub mod catalog;
pub mod compose;
pub mod make_offer;
pub mod resolver;

pub use catalog::{decode_offers, flatten, OfferRecord};
pub use compose::{compose_take_offer, IdentityAcceptDetails, ManualAsset, TakeOfferInput, TakeOfferRequest};
pub use make_offer::{compose_make_offer, MakeOfferInput, MakeOfferOutcome, MakeOfferRequest, OfferAsset, WantedAsset};
pub use resolver::{classify, ResolvedAssetIntent};
