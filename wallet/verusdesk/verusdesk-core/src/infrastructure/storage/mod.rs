pub mod memory;
pub mod persisted;
pub mod rocks;
pub mod traits;

pub use memory::MemoryKvStore;
pub use persisted::PersistedList;
pub use rocks::RocksKvStore;
pub use traits::*;
