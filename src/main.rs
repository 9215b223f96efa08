//! Wallet ledger service entry point.
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│ Gateway  │───▶│  Ledger  │───▶│ Postgres │
//! │  (YAML)  │    │  (axum)  │    │ (engine) │    │ (sqlx)   │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;

use wallet_ledger::config::AppConfig;
use wallet_ledger::db::Database;
use wallet_ledger::gateway::{self, state::AppState};
use wallet_ledger::ledger::engine::LedgerEngine;
use wallet_ledger::logging::init_logging;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut config = AppConfig::load(&env)
        .with_context(|| format!("Failed to load config for env '{}'", env))?;
    if let Some(port) = get_port_override() {
        config.gateway.port = port;
    }

    let _log_guard = init_logging(&config);
    tracing::info!(env = %env, "Starting wallet ledger service");

    let db = Arc::new(
        Database::connect(&config.postgres_url)
            .await
            .context("Failed to connect to PostgreSQL")?,
    );
    tracing::info!("Connected to PostgreSQL");

    let engine = Arc::new(LedgerEngine::new(
        db.clone(),
        config.ledger.retry_policy(),
        config.ledger.lock_timeout(),
    ));

    gateway::run_server(&config.gateway, AppState::new(db, engine)).await
}
