//! Wallet ledger service.
//!
//! Per-user, per-asset balances kept as an append-only, lockable ledger
//! over PostgreSQL. Every credit/debit is applied at most once per
//! pre-issued idempotency key; all serialization is delegated to the
//! store's row locks and transaction isolation.
//!
//! # Modules
//!
//! - [`ledger`] - transaction engine, retry coordination, read-side queries
//! - [`user`] - user directory
//! - [`gateway`] - HTTP surface (axum)
//! - [`db`] - PostgreSQL connection pool
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing setup

pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod user;

// Convenient re-exports at crate root
pub use db::Database;
pub use ledger::amount::Amount;
pub use ledger::engine::{LedgerEngine, Operation};
pub use ledger::error::WalletError;
pub use ledger::retry::RetryPolicy;
pub use ledger::types::{Direction, TransactionType};
