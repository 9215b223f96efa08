//! Idempotency key lifecycle.
//!
//! Keys are issued ahead of use (two-phase: issue, then consume) and
//! transition PENDING -> PROCESSED exactly once, inside the same
//! transaction as the journal write they authorize. An unknown or
//! already-consumed key aborts the enclosing transaction with no
//! partial effects.

use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use super::error::WalletError;
use super::types::{IdempotencyStatus, IssuedKey};

pub struct IdempotencyRegistry;

impl IdempotencyRegistry {
    /// Issue a fresh single-use key in PENDING state.
    pub async fn issue(pool: &PgPool) -> Result<IssuedKey, WalletError> {
        let row = sqlx::query(
            r#"INSERT INTO idempotency_keys_tb (key, status)
               VALUES ($1, 'PENDING')
               RETURNING key, created_at"#,
        )
        .bind(Uuid::new_v4())
        .fetch_one(pool)
        .await?;

        Ok(IssuedKey {
            idempotency_key: row.get("key"),
            status: IdempotencyStatus::Pending,
            created_at: row.get("created_at"),
        })
    }

    /// Lock the key row and verify it is still consumable.
    ///
    /// Runs under the caller's transaction; the row lock is held until
    /// commit or rollback, which serializes races on the same key.
    pub async fn assert_available(
        tx: &mut Transaction<'_, Postgres>,
        key: Uuid,
    ) -> Result<(), WalletError> {
        let row = sqlx::query("SELECT status FROM idempotency_keys_tb WHERE key = $1 FOR UPDATE")
            .bind(key)
            .fetch_optional(&mut **tx)
            .await?;

        let status: String = match row {
            Some(row) => row.get("status"),
            None => return Err(WalletError::InvalidIdempotencyKey),
        };

        if status == IdempotencyStatus::Processed.as_str() {
            return Err(WalletError::IdempotencyKeyAlreadyUsed);
        }
        Ok(())
    }

    /// Consume the key. Must run in the same transaction that appended
    /// the journal entry the key authorizes.
    pub async fn mark_processed(
        tx: &mut Transaction<'_, Postgres>,
        key: Uuid,
    ) -> Result<(), WalletError> {
        sqlx::query(
            "UPDATE idempotency_keys_tb SET status = 'PROCESSED', used_at = NOW() WHERE key = $1",
        )
        .bind(key)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
