//! Append-only journal. Entries are never updated or deleted.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use super::amount::Amount;
use super::error::WalletError;
use super::types::{Direction, TransactionType};

/// Fields for one new journal entry.
#[derive(Debug)]
pub struct NewEntry<'a> {
    pub wallet_id: Uuid,
    pub asset_id: Uuid,
    pub transaction_type: TransactionType,
    pub direction: Direction,
    pub amount: &'a Amount,
    /// External payment correlation (TOPUP only).
    pub transaction_id: Option<Uuid>,
    /// External order correlation (PURCHASE only).
    pub reference_id: Option<Uuid>,
}

pub struct Journal;

impl Journal {
    /// Insert one immutable entry, returning its id and timestamp.
    pub async fn append(
        tx: &mut Transaction<'_, Postgres>,
        entry: NewEntry<'_>,
    ) -> Result<(Uuid, DateTime<Utc>), WalletError> {
        let row = sqlx::query(
            r#"INSERT INTO journal_entries_tb
                 (id, wallet_id, asset_id, transaction_type, direction, amount,
                  transaction_id, reference_id)
               VALUES ($1, $2, $3, $4, $5, $6::numeric, $7, $8)
               RETURNING id, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.wallet_id)
        .bind(entry.asset_id)
        .bind(entry.transaction_type.as_str())
        .bind(entry.direction.as_str())
        .bind(entry.amount.to_string())
        .bind(entry.transaction_id)
        .bind(entry.reference_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok((row.get("id"), row.get("created_at")))
    }
}
