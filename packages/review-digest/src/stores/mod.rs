//! Ledger and archive implementations.

pub mod memory;

pub use memory::MemoryLedger;
