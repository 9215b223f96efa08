//! The ledger transaction engine and its collaborators.
//!
//! Leaf-first: [`assets`] resolves asset codes, [`idempotency`] issues and
//! gates single-use keys, [`wallet_store`] owns wallet rows and their row
//! locks, [`journal`] is the append-only record of every mutation.
//! [`engine`] orchestrates one atomic credit/debit across all of them,
//! [`retry`] wraps the unit of work against transient contention, and
//! [`queries`] serves the lock-free read side.

pub mod amount;
pub mod assets;
pub mod engine;
pub mod error;
pub mod idempotency;
pub mod journal;
pub mod queries;
pub mod retry;
pub mod types;
pub mod wallet_store;

#[cfg(test)]
mod integration_tests;

pub use amount::Amount;
pub use engine::{LedgerEngine, Operation};
pub use error::WalletError;
pub use types::{Direction, TransactionType};
