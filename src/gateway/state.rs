use std::sync::Arc;

use crate::db::Database;
use crate::ledger::engine::LedgerEngine;

/// Shared gateway state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub engine: Arc<LedgerEngine>,
}

impl AppState {
    pub fn new(db: Arc<Database>, engine: Arc<LedgerEngine>) -> Self {
        Self { db, engine }
    }
}
