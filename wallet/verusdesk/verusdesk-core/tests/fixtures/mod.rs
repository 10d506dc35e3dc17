pub mod sample_data;

#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use rpc::*;
#[allow(unused_imports)]
pub use sample_data::*;
