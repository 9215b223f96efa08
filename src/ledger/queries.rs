//! Read-side queries: plain, non-locking reads against the store.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::assets::AssetRegistry;
use super::error::WalletError;
use super::types::{
    Direction, IdempotencyStatus, JournalEntryView, Pagination, TransactionPage, TransactionType,
    WalletBalance,
};

pub struct LedgerQueries;

impl LedgerQueries {
    /// All wallets for a user, optionally narrowed to one asset.
    pub async fn get_balance(
        pool: &PgPool,
        user_id: Uuid,
        asset_code: Option<&str>,
    ) -> Result<Vec<WalletBalance>, WalletError> {
        let user = sqlx::query("SELECT id FROM users_tb WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        if user.is_none() {
            return Err(WalletError::UserNotFound(user_id));
        }

        let asset_id = match asset_code {
            Some(code) => Some(AssetRegistry::resolve(pool, code).await?.id),
            None => None,
        };

        let rows = sqlx::query(
            r#"SELECT w.id, w.user_id, a.code AS asset_name, w.balance::text AS balance
               FROM wallets_tb w
               JOIN asset_types_tb a ON a.id = w.asset_id
               WHERE w.user_id = $1 AND ($2::uuid IS NULL OR w.asset_id = $2)
               ORDER BY a.code"#,
        )
        .bind(user_id)
        .bind(asset_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| WalletBalance {
                wallet_id: row.get("id"),
                user_id: row.get("user_id"),
                asset_name: row.get("asset_name"),
                balance: row.get("balance"),
            })
            .collect())
    }

    /// Journal entries for a wallet, newest first, with a total count.
    pub async fn get_transaction_history(
        pool: &PgPool,
        wallet_id: Uuid,
        transaction_type: Option<TransactionType>,
        limit: i64,
        offset: i64,
    ) -> Result<TransactionPage, WalletError> {
        let type_filter = transaction_type.map(|t| t.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM journal_entries_tb
               WHERE wallet_id = $1 AND ($2::text IS NULL OR transaction_type = $2)"#,
        )
        .bind(wallet_id)
        .bind(type_filter)
        .fetch_one(pool)
        .await?;

        let rows = sqlx::query(
            r#"SELECT j.id, j.wallet_id, w.user_id, a.code AS asset_name,
                      j.transaction_type, j.direction, j.amount::text AS amount,
                      j.transaction_id, j.reference_id, j.created_at
               FROM journal_entries_tb j
               JOIN wallets_tb w ON w.id = j.wallet_id
               JOIN asset_types_tb a ON a.id = j.asset_id
               WHERE j.wallet_id = $1 AND ($2::text IS NULL OR j.transaction_type = $2)
               ORDER BY j.created_at DESC
               LIMIT $3 OFFSET $4"#,
        )
        .bind(wallet_id)
        .bind(type_filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let transactions = rows
            .iter()
            .map(row_to_view)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransactionPage {
            transactions,
            pagination: Pagination::new(total, limit, offset),
        })
    }

    /// Single journal entry, or None when unknown.
    pub async fn get_transaction_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<JournalEntryView>, WalletError> {
        let row = sqlx::query(
            r#"SELECT j.id, j.wallet_id, w.user_id, a.code AS asset_name,
                      j.transaction_type, j.direction, j.amount::text AS amount,
                      j.transaction_id, j.reference_id, j.created_at
               FROM journal_entries_tb j
               JOIN wallets_tb w ON w.id = j.wallet_id
               JOIN asset_types_tb a ON a.id = j.asset_id
               WHERE j.id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.as_ref().map(row_to_view).transpose()
    }
}

fn row_to_view(row: &PgRow) -> Result<JournalEntryView, WalletError> {
    let type_str: String = row.get("transaction_type");
    let transaction_type =
        TransactionType::parse(&type_str).ok_or(WalletError::CorruptRow(type_str))?;

    let direction_str: String = row.get("direction");
    let direction = Direction::parse(&direction_str).ok_or(WalletError::CorruptRow(direction_str))?;

    Ok(JournalEntryView {
        id: row.get("id"),
        transaction_type,
        status: IdempotencyStatus::Processed,
        wallet_id: row.get("wallet_id"),
        user_id: row.get("user_id"),
        asset_name: row.get("asset_name"),
        transaction_id: row.get("transaction_id"),
        reference_id: row.get("reference_id"),
        direction,
        amount: row.get("amount"),
        created_at: row.get("created_at"),
    })
}
