pub mod memory_ledger;
pub mod prepare_env;

pub use memory_ledger::MemoryLedger;
