pub mod json;
pub mod sync;
