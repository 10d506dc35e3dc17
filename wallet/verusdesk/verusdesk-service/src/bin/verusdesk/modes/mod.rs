pub mod currency;
pub mod offers;
pub mod trades;
