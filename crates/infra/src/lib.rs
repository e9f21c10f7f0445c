//! Infrastructure layer: ledger store backends and registry adapters.

pub mod ledger_store;
pub mod registry;

#[cfg(test)]
mod integration_tests;

pub use ledger_store::{InMemoryLedgerStore, PostgresLedgerStore};
pub use registry::InMemoryRegistry;
