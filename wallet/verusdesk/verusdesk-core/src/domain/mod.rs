pub mod currency;
pub mod model;
pub mod offer;

pub use model::{StagedDefinition, TradeDetails, TradeRecord};
