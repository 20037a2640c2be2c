//! Persistent store for the haulbook ledger

mod memory;
mod store;

pub use memory::MemoryStorage;
pub use store::Store;
